use std::fmt;

use garde::Validate;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// 検証済みメールアドレス
///
/// 生成は `Email::parse` 経由のみ。前後の空白は取り除かれる。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Validate, sqlx::Type)]
#[serde(try_from = "String", into = "String")]
#[sqlx(transparent)]
#[garde(transparent)]
pub struct Email(#[garde(email, length(max = 254))] String);

impl Email {
    pub fn parse(value: &str) -> Result<Self, AppError> {
        let email = Self(value.trim().to_string());
        if email.0.is_empty() {
            return Err(AppError::Validation("メールアドレスは必須です".to_string()));
        }
        email.validate().map_err(|report| {
            tracing::debug!(report = %report, "メールアドレス検証エラー");
            AppError::Validation("有効なメールアドレスを入力してください".to_string())
        })?;
        Ok(email)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Email {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
