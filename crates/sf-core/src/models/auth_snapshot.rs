use crate::{Profile, Role, UserAccount};

/// The reconciled identity: the one value the session subsystem produces and
/// the UI consumes.
///
/// `is_authenticated` always equals `user.is_some()`, and `profile` is never
/// present without `user`; mutations go through the state store, which keeps
/// both invariants in a single update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSnapshot {
    pub user: Option<UserAccount>,
    pub profile: Option<Profile>,
    pub is_authenticated: bool,
    pub is_loading: bool,
}

impl Default for AuthSnapshot {
    /// Process-start state: nothing known yet, bootstrap pending.
    fn default() -> Self {
        Self {
            user: None,
            profile: None,
            is_authenticated: false,
            is_loading: true,
        }
    }
}

impl AuthSnapshot {
    /// Terminal signed-out state (bootstrap finished or sign-out completed).
    pub fn signed_out() -> Self {
        Self {
            user: None,
            profile: None,
            is_authenticated: false,
            is_loading: false,
        }
    }

    /// An authenticated admin. False for everything else, including a stale
    /// admin profile hanging off a signed-out identity.
    pub fn is_admin(&self) -> bool {
        self.is_authenticated && self.profile.as_ref().is_some_and(|p| p.role == Role::Admin)
    }

    pub fn is_customer(&self) -> bool {
        self.is_authenticated && self.profile.as_ref().is_some_and(|p| p.role == Role::Customer)
    }
}
