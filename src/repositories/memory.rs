//! テスト用のインメモリストア
//!
//! スキーマと同じ UNIQUE 制約（users.id / accounts.user_id）を再現する。

use std::sync::{Arc, Mutex};

use time::OffsetDateTime;
use uuid::Uuid;

use super::{AccountStore, UserStore};
use crate::error::AppError;
use crate::models::{AccessLevel, Account, Email, NewAccount, NewUser, PageRequest, User};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    accounts: Vec<Account>,
    user_inserts: usize,
}

#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
    /// 検索結果を読んだ後に一度 yield し、同時実行の検索→作成を交差させる
    interleave_lookups: bool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// users / accounts の検索ごとに他タスクへ実行を譲るストア
    pub fn interleaving() -> Self {
        Self {
            interleave_lookups: true,
            ..Self::default()
        }
    }

    async fn after_lookup(&self) {
        if self.interleave_lookups {
            tokio::task::yield_now().await;
        }
    }

    pub fn users(&self) -> Vec<User> {
        self.tables.lock().unwrap().users.clone()
    }

    pub fn accounts(&self) -> Vec<Account> {
        self.tables.lock().unwrap().accounts.clone()
    }

    /// create_user が成功した回数
    pub fn user_inserts(&self) -> usize {
        self.tables.lock().unwrap().user_inserts
    }
}

impl UserStore for InMemoryStore {
    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        let found = {
            let tables = self.tables.lock().unwrap();
            tables.users.iter().find(|u| u.id == id).cloned()
        };
        self.after_lookup().await;
        Ok(found)
    }

    async fn find_user_by_email(&self, email: &Email) -> Result<Option<User>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().find(|u| &u.email == email).cloned())
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut tables = self.tables.lock().unwrap();
        if tables.users.iter().any(|u| u.id == new_user.id) {
            return Err(AppError::Conflict("users".to_string()));
        }

        let user = User {
            id: new_user.id,
            name: new_user.name,
            email: new_user.email,
            avatar_url: new_user.avatar_url,
            password_enabled: new_user.password_enabled,
            account_type: new_user.account_type,
            access_level: AccessLevel::User,
            blocked: false,
            created_at: OffsetDateTime::now_utc(),
        };
        tables.users.push(user.clone());
        tables.user_inserts += 1;
        Ok(user)
    }

    async fn list_users(&self, page: &PageRequest) -> Result<(Vec<User>, i64), AppError> {
        let tables = self.tables.lock().unwrap();
        let total = tables.users.len() as i64;
        let users = tables
            .users
            .iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .cloned()
            .collect();
        Ok((users, total))
    }
}

impl AccountStore for InMemoryStore {
    async fn find_first_account_by_user_id(
        &self,
        user_id: &str,
    ) -> Result<Option<Account>, AppError> {
        let found = {
            let tables = self.tables.lock().unwrap();
            tables
                .accounts
                .iter()
                .find(|a| a.user_id == user_id)
                .cloned()
        };
        self.after_lookup().await;
        Ok(found)
    }

    async fn create_account(&self, new_account: NewAccount) -> Result<Account, AppError> {
        let mut tables = self.tables.lock().unwrap();
        if !tables.users.iter().any(|u| u.id == new_account.user_id) {
            return Err(AppError::Internal(anyhow::anyhow!(
                "accounts.user_id foreign key violation"
            )));
        }
        if tables
            .accounts
            .iter()
            .any(|a| a.user_id == new_account.user_id)
        {
            return Err(AppError::Conflict("accounts".to_string()));
        }

        let now = OffsetDateTime::now_utc();
        let account = Account {
            id: Uuid::new_v4(),
            user_id: new_account.user_id,
            account_type: new_account.account_type,
            provider: new_account.provider,
            provider_account_id: new_account.provider_account_id,
            scope: new_account.scope,
            id_token: new_account.id_token,
            created_at: now,
            updated_at: now,
        };
        tables.accounts.push(account.clone());
        Ok(account)
    }

    async fn update_account_id_token(
        &self,
        account_id: Uuid,
        id_token: &str,
    ) -> Result<Account, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let account = tables
            .accounts
            .iter_mut()
            .find(|a| a.id == account_id)
            .ok_or(AppError::Database(sqlx::Error::RowNotFound))?;
        account.id_token = id_token.to_string();
        account.updated_at = OffsetDateTime::now_utc();
        Ok(account.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AccountType;

    fn new_user(id: &str, email: &str) -> NewUser {
        NewUser {
            id: id.to_string(),
            name: String::new(),
            email: Email::parse(email).unwrap(),
            avatar_url: None,
            password_enabled: false,
            account_type: AccountType::Oauth,
        }
    }

    #[tokio::test]
    async fn test_duplicate_user_id_is_conflict() {
        let store = InMemoryStore::new();
        store
            .create_user(new_user("user_1", "a@example.com"))
            .await
            .unwrap();

        let result = store.create_user(new_user("user_1", "b@example.com")).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert_eq!(store.users().len(), 1);
    }

    #[tokio::test]
    async fn test_same_email_different_id_is_allowed() {
        let store = InMemoryStore::new();
        store
            .create_user(new_user("user_1", "a@example.com"))
            .await
            .unwrap();
        store
            .create_user(new_user("user_2", "a@example.com"))
            .await
            .unwrap();
        assert_eq!(store.users().len(), 2);
    }
}
