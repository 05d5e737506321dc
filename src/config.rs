use secrecy::SecretBox;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub database_url: SecretBox<String>,
    #[serde(default = "default_database_max_connections")]
    pub database_max_connections: u32,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,

    /// ユーザー一覧の1ページあたりの件数
    #[serde(default = "default_users_per_page")]
    pub users_per_page: u32,

    // アイデンティティプロバイダ設定
    /// プロバイダ Backend API のベースURL
    pub identity_api_url: String,
    /// プロバイダ Backend API のシークレットキー（ログ出力禁止）
    pub identity_secret_key: SecretBox<String>,

    /// CORS 許可オリジン（未設定時はすべて許可）
    #[serde(default)]
    pub cors_allowed_origin: Option<String>,
}

const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_USERS_PER_PAGE: u32 = 2;

fn default_database_max_connections() -> u32 {
    DEFAULT_DATABASE_MAX_CONNECTIONS
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_users_per_page() -> u32 {
    DEFAULT_USERS_PER_PAGE
}

impl Config {
    pub fn load() -> Result<Self, envy::Error> {
        envy::from_env()
    }
}
