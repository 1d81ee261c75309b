use crate::Result as AuthResult;

use sf_core::{Profile, ProfileDraft};

use async_trait::async_trait;
use uuid::Uuid;

/// The external profile record store.
///
/// `Ok(None)` from a fetch means the profile does not exist yet (first login
/// after signup) - that is not an error, it triggers synthesis.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn fetch_by_user_id(&self, user_id: Uuid) -> AuthResult<Option<Profile>>;

    async fn insert(&self, draft: &ProfileDraft) -> AuthResult<Profile>;
}
