use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// 外部プロバイダとの紐付け情報
///
/// ユーザーごとに1行のみ保持する。作成後に更新されるのは `id_token` だけ。
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Account {
    pub id: Uuid,
    pub user_id: String,
    /// プライマリメールの検証方式（例: `from_oauth_google`）
    #[sqlx(rename = "type")]
    pub account_type: String,
    pub provider: String,
    pub provider_account_id: String,
    pub scope: Option<String>,
    /// セッショントークン（ログ出力禁止）
    #[serde(skip)]
    pub id_token: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub user_id: String,
    pub account_type: String,
    pub provider: String,
    pub provider_account_id: String,
    pub scope: Option<String>,
    pub id_token: String,
}
