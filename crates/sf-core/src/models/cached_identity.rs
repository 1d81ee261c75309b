use crate::{AuthSnapshot, Profile, UserAccount};

use serde::{Deserialize, Serialize};

/// Persisted partial view of the reconciled identity.
///
/// `is_loading` is deliberately absent from this record; it is recomputed on
/// every rehydration so a cached record can never pin the UI in a loading
/// state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedIdentity {
    pub user: Option<UserAccount>,
    pub profile: Option<Profile>,
    pub is_authenticated: bool,
}

impl CachedIdentity {
    pub fn from_snapshot(snapshot: &AuthSnapshot) -> Self {
        Self {
            user: snapshot.user.clone(),
            profile: snapshot.profile.clone(),
            is_authenticated: snapshot.is_authenticated,
        }
    }

    /// Start-up snapshot for a rehydrated record.
    ///
    /// A cached user or profile suppresses the initial loading state so a
    /// returning visitor does not see a logged-out flash; bootstrap still
    /// runs and may correct a stale cache. `is_authenticated` is recomputed
    /// from the cached user rather than trusted from disk.
    pub fn into_snapshot(self) -> AuthSnapshot {
        let is_loading = self.user.is_none() && self.profile.is_none();
        // An orphaned profile (no owning user) must not survive rehydration.
        let profile = if self.user.is_some() { self.profile } else { None };
        AuthSnapshot {
            is_authenticated: self.user.is_some(),
            user: self.user,
            profile,
            is_loading,
        }
    }
}
