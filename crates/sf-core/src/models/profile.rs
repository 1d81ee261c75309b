//! Profile entity - application-owned extension of a provider identity.

use crate::{Role, UserAccount};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Application-owned record extending an identity with role and contact
/// data. One profile per identity, created lazily on the first successful
/// login if absent. The client only ever reads profiles; writes go through
/// the profile store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Same value as the owning identity's id
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Insert payload for a profile row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDraft {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub phone: String,
    pub role: Role,
}

impl ProfileDraft {
    /// Draft for a first login: provider-supplied metadata with empty-string
    /// defaults and the customer role.
    pub fn first_login(user: &UserAccount) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            full_name: user.display_name.clone().unwrap_or_default(),
            phone: user.phone.clone().unwrap_or_default(),
            role: Role::Customer,
        }
    }
}
