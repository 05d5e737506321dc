pub mod account;
pub mod email;
pub mod pagination;
pub mod user;

pub use account::{Account, NewAccount};
pub use email::Email;
pub use pagination::{PageMeta, PageRequest, Paginated};
pub use user::{AccessLevel, AccountType, NewUser, User, UserDetail, UserSummary};
