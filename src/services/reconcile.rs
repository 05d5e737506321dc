use crate::error::AppError;
use crate::models::{AccountType, Email, NewAccount, NewUser, User};
use crate::repositories::{AccountStore, UserStore};
use crate::services::identity::ExternalIdentityClaims;

/// プロバイダのアイデンティティをローカルの users / accounts に反映する
#[derive(Clone)]
pub struct IdentityReconciler<U, A> {
    users: U,
    accounts: A,
}

impl<U: UserStore, A: AccountStore> IdentityReconciler<U, A> {
    pub fn new(users: U, accounts: A) -> Self {
        Self { users, accounts }
    }

    /// クレームとセッショントークンを突き合わせる
    ///
    /// # 処理フロー
    /// 1. subject id で users 検索
    ///    - 見つからなければ: クレームから users 作成
    /// 2. user_id で accounts 検索
    ///    - 見つからなければ: プライマリメールの検証方式と先頭の外部アカウントから作成
    ///    - 見つかれば: id_token のみ更新（provider / scope は作成時のまま）
    ///
    /// # Errors
    /// 同一 subject の同時作成に負けた側は `AppError::Conflict`
    pub async fn reconcile(
        &self,
        claims: &ExternalIdentityClaims,
        session_token: &str,
    ) -> Result<(), AppError> {
        let user = match self.users.find_user_by_id(&claims.subject_id).await? {
            Some(user) => user,
            None => {
                let user = self.users.create_user(new_user_from_claims(claims)?).await?;
                tracing::info!(
                    user_id = %user.id,
                    account_type = ?user.account_type,
                    "プロバイダユーザーを新規作成"
                );
                user
            }
        };

        match self
            .accounts
            .find_first_account_by_user_id(&user.id)
            .await?
        {
            Some(account) => {
                self.accounts
                    .update_account_id_token(account.id, session_token)
                    .await?;
                tracing::debug!(user_id = %user.id, account_id = %account.id, "id_token 更新");
            }
            None => {
                let account = self
                    .accounts
                    .create_account(new_account_for(&user, claims, session_token))
                    .await?;
                tracing::info!(
                    user_id = %user.id,
                    account_id = %account.id,
                    provider = %account.provider,
                    "アカウント紐付けを作成"
                );
            }
        }

        Ok(())
    }
}

fn new_user_from_claims(claims: &ExternalIdentityClaims) -> Result<NewUser, AppError> {
    let primary = claims.primary_email().ok_or_else(|| {
        tracing::error!(subject_id = %claims.subject_id, "プロバイダユーザーにメールアドレスがない");
        AppError::IdentityProviderResponse("user has no email address".to_string())
    })?;
    let email = Email::parse(&primary.address).map_err(|_| {
        AppError::IdentityProviderResponse("user has an invalid email address".to_string())
    })?;

    Ok(NewUser {
        id: claims.subject_id.clone(),
        name: claims.display_name(),
        email,
        avatar_url: claims.avatar_url.clone(),
        password_enabled: claims.password_enabled,
        account_type: AccountType::from_password_enabled(claims.password_enabled),
    })
}

fn new_account_for(user: &User, claims: &ExternalIdentityClaims, session_token: &str) -> NewAccount {
    let account_type = claims
        .primary_email()
        .and_then(|e| e.strategy.clone())
        .unwrap_or_default();

    let (provider, provider_account_id, scope) = match claims.linked_accounts.first() {
        Some(linked) => (
            linked.provider.clone(),
            linked.external_id.clone(),
            linked.approved_scopes.clone(),
        ),
        None => (String::new(), String::new(), None),
    };

    NewAccount {
        user_id: user.id.clone(),
        account_type,
        provider,
        provider_account_id,
        scope,
        id_token: session_token.to_string(),
    }
}
