pub mod auth_change;
pub mod auth_session;
pub mod auth_snapshot;
pub mod cached_identity;
pub mod profile;
pub mod role;
pub mod user_account;
