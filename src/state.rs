use std::sync::Arc;

use secrecy::ExposeSecret;
use sqlx::PgPool;

use crate::config::Config;
use crate::repositories::{AccountRepository, UserRepository};
use crate::services::{HttpIdentityProvider, IdentityReconciler, UserService};

/// アプリケーション共有状態
///
/// axum の State として全ハンドラーで共有される。
/// Clone は必須（axum が内部で clone するため）。
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL コネクションプール
    pub db_pool: PgPool,
    /// アプリケーション設定（Arc で共有）
    pub config: Arc<Config>,
    /// ユーザー一覧・取得・登録
    pub user_service: UserService<UserRepository>,
    /// プロバイダアイデンティティの同期
    pub reconciler: IdentityReconciler<UserRepository, AccountRepository>,
    /// アイデンティティプロバイダクライアント
    pub identity_provider: HttpIdentityProvider,
}

impl AppState {
    /// 新しい AppState を作成
    pub fn new(db_pool: PgPool, config: Config) -> Self {
        let config = Arc::new(config);
        let user_repo = UserRepository::new(db_pool.clone());
        let account_repo = AccountRepository::new(db_pool.clone());

        let user_service = UserService::new(user_repo.clone(), config.users_per_page);
        let reconciler = IdentityReconciler::new(user_repo, account_repo);
        let identity_provider = HttpIdentityProvider::new(
            config.identity_api_url.clone(),
            config.identity_secret_key.expose_secret().clone(),
        );

        Self {
            db_pool,
            config,
            user_service,
            reconciler,
            identity_provider,
        }
    }
}
