use crate::AuthSession;

/// Session lifecycle event delivered by the identity provider's long-lived
/// subscription. One tagged variant per provider event kind, dispatched
/// through a single handler rather than branching scattered across call
/// sites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthChange {
    pub kind: AuthChangeKind,
    pub session: Option<AuthSession>,
}

impl AuthChange {
    pub fn new(kind: AuthChangeKind, session: Option<AuthSession>) -> Self {
        Self { kind, session }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthChangeKind {
    /// Provider replayed its initial state after subscribing
    Bootstrapped,
    SignedIn,
    SignedOut,
    TokenRefreshed,
}

impl AuthChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bootstrapped => "bootstrapped",
            Self::SignedIn => "signed_in",
            Self::SignedOut => "signed_out",
            Self::TokenRefreshed => "token_refreshed",
        }
    }
}
