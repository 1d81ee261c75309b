pub mod error;
pub mod models;

pub use error::{CoreError, CoreResult};
pub use models::auth_change::{AuthChange, AuthChangeKind};
pub use models::auth_session::AuthSession;
pub use models::auth_snapshot::AuthSnapshot;
pub use models::cached_identity::CachedIdentity;
pub use models::profile::{Profile, ProfileDraft};
pub use models::role::Role;
pub use models::user_account::UserAccount;

#[cfg(test)]
mod tests;
