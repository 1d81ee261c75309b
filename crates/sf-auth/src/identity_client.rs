use crate::Result as AuthResult;

use sf_core::{AuthChange, AuthSession, UserAccount};

use async_trait::async_trait;
use tokio::sync::broadcast;

/// The external identity provider, seen from the client side.
///
/// Sign-in, sign-up, token issuance and refresh all live behind this
/// boundary; the reconciler only reads the current session and listens to
/// the lifecycle stream. `subscribe` hands out the long-lived event
/// receiver; dropping it is unsubscription.
#[async_trait]
pub trait IdentityClient: Send + Sync {
    async fn current_session(&self) -> AuthResult<Option<AuthSession>>;

    async fn current_user(&self) -> AuthResult<Option<UserAccount>>;

    /// Invalidate the provider-side session. Local state is the caller's
    /// responsibility.
    async fn sign_out(&self) -> AuthResult<()>;

    fn subscribe(&self) -> broadcast::Receiver<AuthChange>;
}
