use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use garde::Validate;
use serde::Deserialize;

use crate::error::AppError;
use crate::models::{Email, Paginated, UserDetail, UserSummary};
use crate::services::Registration;
use crate::state::AppState;

/// 一覧取得のクエリパラメータ
///
/// 負数や 0 も受け付け、`page_number` で 1 に丸める
#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    #[serde(default = "default_page")]
    pub page: i64,
}

fn default_page() -> i64 {
    1
}

impl ListUsersQuery {
    pub fn page_number(&self) -> u32 {
        u32::try_from(self.page.max(1)).unwrap_or(u32::MAX)
    }
}

/// ユーザー登録リクエスト
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterUserRequest {
    /// プロバイダが払い出した subject id
    #[garde(length(min = 1, max = 255))]
    pub id: String,
    #[garde(length(max = 255))]
    pub name: String,
    #[garde(skip)]
    pub email: String,
    #[garde(url)]
    pub avatar_url: Option<String>,
    #[garde(skip)]
    #[serde(default)]
    pub password_enabled: bool,
}

/// ユーザー一覧ハンドラー
///
/// GET /api/users?page=N
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<Paginated<UserSummary>>, AppError> {
    let page = query.page_number();
    let users = state.user_service.find_all(page).await?;
    tracing::debug!(page, count = users.data.len(), "ユーザー一覧取得");
    Ok(Json(users))
}

/// ユーザー詳細ハンドラー
///
/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserDetail>, AppError> {
    let user = state.user_service.find_by_id(&user_id).await?;
    Ok(Json(user))
}

/// ユーザー登録ハンドラー
///
/// POST /api/users
pub async fn register_user(
    State(state): State<AppState>,
    Json(request): Json<RegisterUserRequest>,
) -> Result<StatusCode, AppError> {
    let registration = validate_register_request(request)?;
    state.user_service.create(registration).await?;
    Ok(StatusCode::CREATED)
}

/// 登録リクエストのバリデーション
fn validate_register_request(request: RegisterUserRequest) -> Result<Registration, AppError> {
    request
        .validate()
        .map_err(|report| AppError::Validation(report.to_string()))?;

    let email = Email::parse(&request.email)?;

    Ok(Registration {
        id: request.id,
        name: request.name,
        email,
        avatar_url: request.avatar_url,
        password_enabled: request.password_enabled,
    })
}
