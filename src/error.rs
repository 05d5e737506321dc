use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("認証エラー: {0}")]
    Unauthenticated(String),

    #[error("バリデーションエラー: {0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    AlreadyExists(String),

    /// UNIQUE制約違反（同時作成の競合など）
    #[error("競合が発生しました: {0}")]
    Conflict(String),

    #[error("データベースエラー")]
    Database(#[from] sqlx::Error),

    #[error("アイデンティティプロバイダ通信エラー")]
    IdentityProvider(#[from] reqwest::Error),

    #[error("アイデンティティプロバイダ応答エラー: {0}")]
    IdentityProviderResponse(String),

    #[error("内部エラー")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// sqlx のエラーを分類する
    ///
    /// UNIQUE制約違反は `Conflict` として呼び出し側で捕捉できるようにし、
    /// それ以外はそのまま `Database` として伝播させる。
    pub fn from_write(error: sqlx::Error, target: &str) -> Self {
        if let sqlx::Error::Database(db_err) = &error
            && db_err.is_unique_violation()
        {
            tracing::warn!(
                target_record = %target,
                constraint = ?db_err.constraint(),
                "UNIQUE制約違反"
            );
            return Self::Conflict(target.to_string());
        }
        Self::Database(error)
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Unauthenticated(reason) => {
                tracing::warn!(reason = %reason, "認証失敗");
                (StatusCode::UNAUTHORIZED, "認証が必要です".to_string())
            }
            Self::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::AlreadyExists(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::Conflict(_) => (
                StatusCode::CONFLICT,
                "同じリソースが同時に作成されました".to_string(),
            ),
            Self::Database(e) => {
                tracing::error!(error = ?e, "データベースエラー");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "内部エラーが発生しました".to_string(),
                )
            }
            Self::IdentityProvider(e) => {
                tracing::error!(error = ?e, "アイデンティティプロバイダ通信エラー");
                (
                    StatusCode::BAD_GATEWAY,
                    "認証サービスとの通信に失敗しました".to_string(),
                )
            }
            Self::IdentityProviderResponse(msg) => {
                tracing::error!(detail = %msg, "アイデンティティプロバイダ応答エラー");
                (
                    StatusCode::BAD_GATEWAY,
                    "認証サービスとの通信に失敗しました".to_string(),
                )
            }
            Self::Internal(e) => {
                tracing::error!(error = ?e, "内部エラー");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "内部エラーが発生しました".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
