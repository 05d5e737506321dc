use sqlx::PgPool;

use super::UserStore;
use crate::error::AppError;
use crate::models::{Email, NewUser, PageRequest, User};

#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl UserStore for UserRepository {
    /// ユーザーIDでユーザーを検索
    ///
    /// # Note
    /// DB セットアップ後は `query_as!` マクロに変更してコンパイル時SQL検証を有効にすること
    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, avatar_url, password_enabled,
                   account_type, access_level, blocked, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// メールアドレスで最初に見つかったユーザーを返す
    async fn find_user_by_email(&self, email: &Email) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, avatar_url, password_enabled,
                   account_type, access_level, blocked, created_at
            FROM users
            WHERE email = $1
            ORDER BY created_at
            LIMIT 1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// 新しいユーザーを作成
    ///
    /// access_level / blocked / created_at は DB のデフォルト値
    async fn create_user(&self, new_user: NewUser) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, avatar_url, password_enabled, account_type)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, email, avatar_url, password_enabled,
                      account_type, access_level, blocked, created_at
            "#,
        )
        .bind(&new_user.id)
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(&new_user.avatar_url)
        .bind(new_user.password_enabled)
        .bind(new_user.account_type)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_write(e, "users"))
    }

    async fn list_users(&self, page: &PageRequest) -> Result<(Vec<User>, i64), AppError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, avatar_url, password_enabled,
                   account_type, access_level, blocked, created_at
            FROM users
            ORDER BY created_at, id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((users, total))
    }
}
