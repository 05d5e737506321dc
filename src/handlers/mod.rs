pub mod auth;
pub mod health;
pub mod users;

pub use auth::sync_identity;
pub use health::health_check;
pub use users::{get_user, list_users, register_user};
