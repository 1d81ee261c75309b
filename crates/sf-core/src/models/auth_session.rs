use crate::UserAccount;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A time-bounded proof of authentication issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub user: UserAccount,
    pub access_token: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl AuthSession {
    pub fn new(user: UserAccount, access_token: String) -> Self {
        Self {
            user,
            access_token,
            expires_at: None,
        }
    }
}
