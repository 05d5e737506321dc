//! アイデンティティプロバイダ連携
//!
//! セッショントークンからプロバイダ側のユーザー情報（クレーム）を解決する。
//!
//! # Security
//! - セッショントークンとシークレットキーはログに出力しない
//! - プロバイダから返却された値は検証済みとして扱う

#![allow(async_fn_in_trait)]

use std::sync::Arc;

use serde::Deserialize;

use crate::error::AppError;

/// プロバイダ側で検証済みのメールアドレス
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedEmail {
    pub address: String,
    /// 検証方式（例: `from_oauth_google`, `email_code`）
    pub strategy: Option<String>,
}

/// プロバイダに紐付いた外部アカウント
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedAccount {
    pub provider: String,
    pub external_id: String,
    pub approved_scopes: Option<String>,
}

/// プロバイダから受け取ったユーザークレーム
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalIdentityClaims {
    pub subject_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// 先頭がプライマリ
    pub email_addresses: Vec<VerifiedEmail>,
    pub avatar_url: Option<String>,
    pub password_enabled: bool,
    pub linked_accounts: Vec<LinkedAccount>,
}

impl ExternalIdentityClaims {
    pub fn primary_email(&self) -> Option<&VerifiedEmail> {
        self.email_addresses.first()
    }

    /// 表示名を組み立てる
    ///
    /// 姓名どちらかがあれば `"first last"`（欠けた側は空文字、区切りの空白は残す）。
    /// どちらも無ければ空文字。
    pub fn display_name(&self) -> String {
        let first = self.first_name.as_deref().filter(|s| !s.is_empty());
        let last = self.last_name.as_deref().filter(|s| !s.is_empty());

        if first.is_none() && last.is_none() {
            return String::new();
        }
        format!("{} {}", first.unwrap_or_default(), last.unwrap_or_default())
    }
}

/// アイデンティティプロバイダのポート
pub trait IdentityProvider: Send + Sync {
    /// セッショントークンを検証し、対応するユーザーのクレームを返す
    ///
    /// # Errors
    /// - トークンが無効: `AppError::Unauthenticated`
    /// - 通信失敗: `AppError::IdentityProvider`
    /// - 想定外の応答: `AppError::IdentityProviderResponse`
    async fn resolve_identity(&self, session_token: &str)
    -> Result<ExternalIdentityClaims, AppError>;
}

/// トークンイントロスペクションのレスポンス
#[derive(Debug, Deserialize)]
struct IntrospectionResponse {
    active: bool,
    sub: Option<String>,
}

/// 有効なセッションの subject id を取り出す
///
/// 無効なセッション、sub 欠落、空の sub はいずれも未認証として扱う。
fn subject_from_introspection(introspection: IntrospectionResponse) -> Result<String, AppError> {
    match introspection {
        IntrospectionResponse {
            active: true,
            sub: Some(sub),
        } if !sub.is_empty() => Ok(sub),
        _ => Err(AppError::Unauthenticated("inactive_session".to_string())),
    }
}

/// プロバイダ Backend API のユーザーレスポンス
#[derive(Debug, Deserialize)]
struct ProviderUserResponse {
    id: String,
    first_name: Option<String>,
    last_name: Option<String>,
    image_url: Option<String>,
    #[serde(default)]
    password_enabled: bool,
    #[serde(default)]
    email_addresses: Vec<ProviderEmailAddress>,
    #[serde(default)]
    external_accounts: Vec<ProviderExternalAccount>,
}

#[derive(Debug, Deserialize)]
struct ProviderEmailAddress {
    email_address: String,
    verification: Option<ProviderVerification>,
}

#[derive(Debug, Deserialize)]
struct ProviderVerification {
    strategy: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderExternalAccount {
    provider: String,
    id: String,
    approved_scopes: Option<String>,
}

impl From<ProviderUserResponse> for ExternalIdentityClaims {
    fn from(user: ProviderUserResponse) -> Self {
        Self {
            subject_id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email_addresses: user
                .email_addresses
                .into_iter()
                .map(|e| VerifiedEmail {
                    address: e.email_address,
                    strategy: e.verification.and_then(|v| v.strategy),
                })
                .collect(),
            avatar_url: user.image_url,
            password_enabled: user.password_enabled,
            linked_accounts: user
                .external_accounts
                .into_iter()
                .map(|a| LinkedAccount {
                    provider: a.provider,
                    external_id: a.id,
                    approved_scopes: a.approved_scopes,
                })
                .collect(),
        }
    }
}

/// HTTP ベースのアイデンティティプロバイダクライアント
///
/// # Security
/// secret_key はログに出力しない
#[derive(Clone)]
pub struct HttpIdentityProvider {
    client: reqwest::Client,
    api_url: String,
    /// Backend API シークレットキー（機密情報 - ログ出力禁止）
    secret_key: Arc<String>,
}

impl HttpIdentityProvider {
    pub fn new(api_url: String, secret_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            secret_key: Arc::new(secret_key),
        }
    }

    /// セッショントークンをイントロスペクトして subject id を取得
    async fn introspect(&self, session_token: &str) -> Result<String, AppError> {
        let url = format!("{}/oauth2/introspect", self.api_url);
        let body = format!("token={}", urlencoding::encode(session_token));

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.secret_key.as_str())
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::error!(status = %status, "トークンイントロスペクション失敗");
            return Err(AppError::IdentityProviderResponse(format!(
                "introspection returned status: {}",
                status
            )));
        }

        let introspection: IntrospectionResponse = response.json().await.map_err(|e| {
            tracing::error!(error = ?e, "イントロスペクションレスポンスのパースエラー");
            AppError::IdentityProviderResponse("invalid introspection response".to_string())
        })?;

        subject_from_introspection(introspection)
    }

    /// subject id でプロバイダのユーザー情報を取得
    async fn get_user(&self, subject_id: &str) -> Result<ProviderUserResponse, AppError> {
        let url = format!(
            "{}/v1/users/{}",
            self.api_url,
            urlencoding::encode(subject_id)
        );

        let response = self
            .client
            .get(&url)
            .bearer_auth(self.secret_key.as_str())
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::error!(status = %status, subject_id = %subject_id, "プロバイダユーザー取得失敗");
            return Err(AppError::IdentityProviderResponse(format!(
                "user lookup returned status: {}",
                status
            )));
        }

        response.json().await.map_err(|e| {
            tracing::error!(error = ?e, "プロバイダユーザーレスポンスのパースエラー");
            AppError::IdentityProviderResponse("invalid user response".to_string())
        })
    }
}

impl IdentityProvider for HttpIdentityProvider {
    async fn resolve_identity(
        &self,
        session_token: &str,
    ) -> Result<ExternalIdentityClaims, AppError> {
        let subject_id = self.introspect(session_token).await?;
        tracing::debug!(subject_id = %subject_id, "セッション検証成功");

        let user = self.get_user(&subject_id).await?;
        tracing::debug!(subject_id = %subject_id, "プロバイダユーザー取得成功");

        Ok(user.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(first: Option<&str>, last: Option<&str>) -> ExternalIdentityClaims {
        ExternalIdentityClaims {
            subject_id: "user_1".to_string(),
            first_name: first.map(str::to_string),
            last_name: last.map(str::to_string),
            email_addresses: vec![],
            avatar_url: None,
            password_enabled: false,
            linked_accounts: vec![],
        }
    }

    #[test]
    fn test_display_name_full() {
        assert_eq!(claims(Some("John"), Some("Doe")).display_name(), "John Doe");
    }

    #[test]
    fn test_display_name_first_only_keeps_trailing_space() {
        assert_eq!(claims(Some("John"), None).display_name(), "John ");
    }

    #[test]
    fn test_display_name_last_only_keeps_leading_space() {
        assert_eq!(claims(None, Some("Doe")).display_name(), " Doe");
    }

    #[test]
    fn test_display_name_absent_is_empty() {
        assert_eq!(claims(None, None).display_name(), "");
        assert_eq!(claims(Some(""), Some("")).display_name(), "");
    }

    #[test]
    fn test_provider_user_response_maps_to_claims() {
        let json = r#"{
            "id": "user_2abc",
            "first_name": "John",
            "last_name": null,
            "image_url": "https://img.example.com/john.png",
            "password_enabled": false,
            "email_addresses": [
                {
                    "email_address": "john@example.com",
                    "verification": { "strategy": "from_oauth_google" }
                },
                {
                    "email_address": "john@work.example.com",
                    "verification": null
                }
            ],
            "external_accounts": [
                {
                    "provider": "oauth_google",
                    "id": "eac_123",
                    "approved_scopes": "email openid profile"
                }
            ]
        }"#;

        let response: ProviderUserResponse = serde_json::from_str(json).unwrap();
        let claims = ExternalIdentityClaims::from(response);

        assert_eq!(claims.subject_id, "user_2abc");
        assert_eq!(claims.display_name(), "John ");
        assert_eq!(
            claims.avatar_url.as_deref(),
            Some("https://img.example.com/john.png")
        );
        let primary = claims.primary_email().unwrap();
        assert_eq!(primary.address, "john@example.com");
        assert_eq!(primary.strategy.as_deref(), Some("from_oauth_google"));
        assert_eq!(claims.email_addresses[1].strategy, None);
        assert_eq!(claims.linked_accounts.len(), 1);
        assert_eq!(claims.linked_accounts[0].provider, "oauth_google");
        assert_eq!(claims.linked_accounts[0].external_id, "eac_123");
    }

    #[test]
    fn test_provider_user_response_defaults_missing_lists() {
        let json = r#"{ "id": "user_3", "first_name": null, "last_name": null, "image_url": null }"#;

        let response: ProviderUserResponse = serde_json::from_str(json).unwrap();
        let claims = ExternalIdentityClaims::from(response);

        assert!(claims.email_addresses.is_empty());
        assert!(claims.linked_accounts.is_empty());
        assert!(!claims.password_enabled);
        assert!(claims.primary_email().is_none());
    }

    fn introspection(active: bool, sub: Option<&str>) -> IntrospectionResponse {
        IntrospectionResponse {
            active,
            sub: sub.map(str::to_string),
        }
    }

    #[test]
    fn test_active_session_yields_subject() {
        let subject = subject_from_introspection(introspection(true, Some("user_2abc"))).unwrap();
        assert_eq!(subject, "user_2abc");
    }

    #[test]
    fn test_inactive_session_is_unauthenticated() {
        let result = subject_from_introspection(introspection(false, Some("user_2abc")));
        assert!(matches!(result, Err(AppError::Unauthenticated(_))));
    }

    #[test]
    fn test_missing_sub_is_unauthenticated() {
        let result = subject_from_introspection(introspection(true, None));
        assert!(matches!(result, Err(AppError::Unauthenticated(_))));
    }

    #[test]
    fn test_empty_sub_is_unauthenticated() {
        let result = subject_from_introspection(introspection(true, Some("")));
        assert!(matches!(result, Err(AppError::Unauthenticated(_))));
    }

    #[test]
    fn test_introspection_response_parses_inactive_without_sub() {
        let response: IntrospectionResponse = serde_json::from_str(r#"{"active":false}"#).unwrap();
        assert!(!response.active);
        assert!(response.sub.is_none());
    }

    #[test]
    fn test_new_trims_trailing_slash() {
        let provider =
            HttpIdentityProvider::new("https://idp.example.com/".to_string(), "sk".to_string());
        assert_eq!(provider.api_url, "https://idp.example.com");
    }
}
