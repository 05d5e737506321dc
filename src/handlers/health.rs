use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

use crate::state::AppState;

/// ヘルスチェックレスポンス
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub database: &'static str,
}

impl HealthResponse {
    fn from_database(database_ok: bool) -> (StatusCode, Self) {
        if database_ok {
            (
                StatusCode::OK,
                Self {
                    status: "ok",
                    version: env!("CARGO_PKG_VERSION"),
                    database: "ok",
                },
            )
        } else {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Self {
                    status: "degraded",
                    version: env!("CARGO_PKG_VERSION"),
                    database: "unavailable",
                },
            )
        }
    }
}

/// ヘルスチェックハンドラー
///
/// GET /api/health
///
/// データベースへの疎通を含めて稼働状況を返す。
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database_ok = match sqlx::query("SELECT 1").execute(&state.db_pool).await {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!(error = ?e, "ヘルスチェック: データベース疎通失敗");
            false
        }
    };

    let (status, body) = HealthResponse::from_database(database_ok);
    (status, Json(body))
}
