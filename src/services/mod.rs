pub mod identity;
pub mod reconcile;
pub mod users;

pub use identity::{ExternalIdentityClaims, HttpIdentityProvider, IdentityProvider};
pub use reconcile::IdentityReconciler;
pub use users::{Registration, UserService};
