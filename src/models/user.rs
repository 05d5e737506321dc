use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

use super::Email;

/// アカウント種別
///
/// パスワード認証が有効なら `Ownership`、ソーシャルログインのみなら `Oauth`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "account_type", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountType {
    Ownership,
    Oauth,
}

impl AccountType {
    pub fn from_password_enabled(password_enabled: bool) -> Self {
        if password_enabled {
            Self::Ownership
        } else {
            Self::Oauth
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "access_level", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum AccessLevel {
    User,
    Admin,
}

#[derive(Debug, Clone, FromRow)]
pub struct User {
    /// プロバイダが払い出した subject id
    pub id: String,
    pub name: String,
    pub email: Email,
    pub avatar_url: Option<String>,
    pub password_enabled: bool,
    pub account_type: AccountType,
    pub access_level: AccessLevel,
    pub blocked: bool,
    pub created_at: OffsetDateTime,
}

/// ユーザー作成時の入力
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: String,
    pub name: String,
    pub email: Email,
    pub avatar_url: Option<String>,
    pub password_enabled: bool,
    pub account_type: AccountType,
}

/// 一覧用の射影
#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar_url: String,
    pub access_level: AccessLevel,
    pub blocked: bool,
    pub account_type: AccountType,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email.into(),
            avatar_url: user.avatar_url.unwrap_or_default(),
            access_level: user.access_level,
            blocked: user.blocked,
            account_type: user.account_type,
            created_at: user.created_at,
        }
    }
}

/// 詳細取得用の射影
#[derive(Debug, Serialize)]
pub struct UserDetail {
    pub id: String,
    pub name: String,
    pub email: Email,
    pub avatar_url: String,
    pub password_enabled: bool,
    pub account_type: AccountType,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<User> for UserDetail {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            avatar_url: user.avatar_url.unwrap_or_default(),
            password_enabled: user.password_enabled,
            account_type: user.account_type,
            created_at: user.created_at,
        }
    }
}
