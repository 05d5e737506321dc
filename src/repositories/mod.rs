#![allow(async_fn_in_trait)]

pub mod account;
#[cfg(test)]
pub mod memory;
pub mod user;

pub use account::AccountRepository;
pub use user::UserRepository;

use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Account, Email, NewAccount, NewUser, PageRequest, User};

/// ユーザーの永続化ポート
pub trait UserStore: Send + Sync {
    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>, AppError>;

    async fn find_user_by_email(&self, email: &Email) -> Result<Option<User>, AppError>;

    /// # Errors
    /// 同一 id が既に存在する場合は `AppError::Conflict`
    async fn create_user(&self, new_user: NewUser) -> Result<User, AppError>;

    /// 作成日時順で1ページ分を取得し、全件数と合わせて返す
    async fn list_users(&self, page: &PageRequest) -> Result<(Vec<User>, i64), AppError>;
}

/// 外部アカウント紐付けの永続化ポート
pub trait AccountStore: Send + Sync {
    async fn find_first_account_by_user_id(
        &self,
        user_id: &str,
    ) -> Result<Option<Account>, AppError>;

    /// # Errors
    /// 同一ユーザーのアカウントが既に存在する場合は `AppError::Conflict`
    async fn create_account(&self, new_account: NewAccount) -> Result<Account, AppError>;

    async fn update_account_id_token(
        &self,
        account_id: Uuid,
        id_token: &str,
    ) -> Result<Account, AppError>;
}
