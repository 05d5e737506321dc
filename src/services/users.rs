use crate::error::AppError;
use crate::models::{
    AccountType, Email, NewUser, PageMeta, PageRequest, Paginated, UserDetail, UserSummary,
};
use crate::repositories::UserStore;

/// 登録リクエストから渡されるユーザー情報
#[derive(Debug, Clone)]
pub struct Registration {
    pub id: String,
    pub name: String,
    pub email: Email,
    pub avatar_url: Option<String>,
    pub password_enabled: bool,
}

/// ユーザー一覧・取得・登録サービス
#[derive(Clone)]
pub struct UserService<U> {
    users: U,
    per_page: u32,
}

impl<U: UserStore> UserService<U> {
    pub fn new(users: U, per_page: u32) -> Self {
        Self { users, per_page }
    }

    /// ユーザー一覧をページ単位で取得
    pub async fn find_all(&self, page: u32) -> Result<Paginated<UserSummary>, AppError> {
        let request = PageRequest::new(page, self.per_page);
        let (users, total) = self.users.list_users(&request).await?;

        Ok(Paginated {
            data: users.into_iter().map(UserSummary::from).collect(),
            meta: PageMeta::new(total, &request),
        })
    }

    pub async fn find_by_id(&self, user_id: &str) -> Result<UserDetail, AppError> {
        self.users
            .find_user_by_id(user_id)
            .await?
            .map(UserDetail::from)
            .ok_or_else(|| AppError::NotFound("ユーザーが見つかりません".to_string()))
    }

    /// ユーザー登録
    ///
    /// 同じメールアドレスのユーザーがいれば登録しない。
    /// 登録ユーザーの account_type は常に OWNERSHIP。
    pub async fn create(&self, registration: Registration) -> Result<(), AppError> {
        if self
            .users
            .find_user_by_email(&registration.email)
            .await?
            .is_some()
        {
            tracing::info!(email = %registration.email, "登録済みメールアドレス");
            return Err(AppError::AlreadyExists("ユーザーは既に登録されています".to_string()));
        }

        let user = self
            .users
            .create_user(NewUser {
                id: registration.id,
                name: registration.name,
                email: registration.email,
                avatar_url: registration.avatar_url,
                password_enabled: registration.password_enabled,
                account_type: AccountType::Ownership,
            })
            .await?;

        tracing::info!(user_id = %user.id, "ユーザー登録成功");
        Ok(())
    }
}
