use sqlx::PgPool;
use uuid::Uuid;

use super::AccountStore;
use crate::error::AppError;
use crate::models::{Account, NewAccount};

#[derive(Clone)]
pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl AccountStore for AccountRepository {
    async fn find_first_account_by_user_id(
        &self,
        user_id: &str,
    ) -> Result<Option<Account>, AppError> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, user_id, type, provider, provider_account_id, scope, id_token,
                   created_at, updated_at
            FROM accounts
            WHERE user_id = $1
            ORDER BY created_at
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    /// 新しいアカウント紐付けを作成
    ///
    /// # Errors
    /// - UNIQUE制約違反時（accounts_user_id_key）: `AppError::Conflict`
    async fn create_account(&self, new_account: NewAccount) -> Result<Account, AppError> {
        sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (user_id, type, provider, provider_account_id, scope, id_token)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, type, provider, provider_account_id, scope, id_token,
                      created_at, updated_at
            "#,
        )
        .bind(&new_account.user_id)
        .bind(&new_account.account_type)
        .bind(&new_account.provider)
        .bind(&new_account.provider_account_id)
        .bind(&new_account.scope)
        .bind(&new_account.id_token)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_write(e, "accounts"))
    }

    /// id_token のみを更新
    ///
    /// # Note
    /// id_token はログに出力しないこと
    async fn update_account_id_token(
        &self,
        account_id: Uuid,
        id_token: &str,
    ) -> Result<Account, AppError> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            UPDATE accounts
            SET id_token = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, user_id, type, provider, provider_account_id, scope, id_token,
                      created_at, updated_at
            "#,
        )
        .bind(account_id)
        .bind(id_token)
        .fetch_one(&self.pool)
        .await?;

        Ok(account)
    }
}
