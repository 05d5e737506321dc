use axum::{
    extract::State,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
};

use crate::error::AppError;
use crate::repositories::{AccountStore, UserStore};
use crate::services::{IdentityProvider, IdentityReconciler};
use crate::state::AppState;

/// アイデンティティ同期ハンドラー
///
/// POST /api/auth/sync
///
/// # Security
/// セッショントークンはログに出力しない
pub async fn sync_identity(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    let user_id = sync(&state.identity_provider, &state.reconciler, &headers).await?;

    tracing::info!(user_id = %user_id, "アイデンティティ同期成功");
    Ok(StatusCode::NO_CONTENT)
}

/// 処理フロー:
/// 1. Authorization ヘッダーからセッショントークンを取得
/// 2. プロバイダでトークン検証 + ユーザークレーム取得
/// 3. users / accounts に反映
///
/// 同期したユーザーの subject id を返す
async fn sync<P, U, A>(
    provider: &P,
    reconciler: &IdentityReconciler<U, A>,
    headers: &HeaderMap,
) -> Result<String, AppError>
where
    P: IdentityProvider,
    U: UserStore,
    A: AccountStore,
{
    // 1. セッショントークン取得
    let session_token = bearer_token(headers)?;

    // 2. プロバイダからクレーム取得
    let claims = provider.resolve_identity(session_token).await?;

    // 3. ローカルレコードへ反映
    reconciler.reconcile(&claims, session_token).await?;

    Ok(claims.subject_id)
}

/// `Authorization: Bearer <token>` からトークンを取り出す
fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthenticated("missing_authorization".to_string()))?
        .to_str()
        .map_err(|_| AppError::Unauthenticated("malformed_authorization".to_string()))?;

    let token = value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Unauthenticated("malformed_authorization".to_string()))?;

    Ok(token)
}
