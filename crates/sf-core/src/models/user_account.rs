use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Provider-issued identity.
///
/// Only what the identity provider hands back: the opaque identifier, the
/// email, and whatever optional contact metadata the provider collected at
/// signup. Role and application data live on the [`Profile`](crate::Profile).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: Uuid,
    pub email: String,
    /// Display name from the provider's user metadata
    pub display_name: Option<String>,
    /// Phone number from the provider's user metadata
    pub phone: Option<String>,
}

impl UserAccount {
    pub fn new(id: Uuid, email: String) -> Self {
        Self {
            id,
            email,
            display_name: None,
            phone: None,
        }
    }
}
