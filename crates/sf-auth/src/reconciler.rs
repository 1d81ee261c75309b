use crate::{
    AuthError, IdentityClient, IdentityStateStore, Navigator, ProfileStore, Result as AuthResult,
    RetryPolicy, Route,
};

use sf_config::SessionConfig;
use sf_core::{AuthChange, AuthChangeKind, Profile, ProfileDraft, UserAccount};

use std::panic::Location;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use error_location::ErrorLocation;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{Mutex, broadcast};
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Tuning for one reconciler instance.
#[derive(Debug, Clone)]
pub struct ReconcilerConfig {
    /// Total profile fetch attempts per resolution (attempts, not retries)
    pub profile_fetch_attempts: u32,
    /// Fixed delay between profile fetch attempts
    pub profile_retry_delay: Duration,
    /// Bound on any single provider or profile-store call
    pub fetch_timeout: Duration,
    /// Where a terminal sign-out sends the user
    pub signout_route: Route,
}

impl ReconcilerConfig {
    pub fn new(session: &SessionConfig, signout_route: Route) -> Self {
        Self {
            profile_fetch_attempts: session.profile_fetch_attempts,
            profile_retry_delay: Duration::from_millis(session.profile_retry_delay_ms),
            fetch_timeout: Duration::from_secs(session.fetch_timeout_secs),
            signout_route,
        }
    }
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self::new(&SessionConfig::default(), Route::SiteRoot)
    }
}

/// The single authority that turns provider lifecycle events into identity
/// store writes.
///
/// Bootstrap and the live subscription run concurrently, so every
/// reconciliation attempt takes a fresh sequence number and each store write
/// checks it is still current before landing. Writes are last-write-wins by
/// completion order: a slow bootstrap can never resurrect state a faster
/// `SignedOut` already cleared.
pub struct SessionReconciler {
    client: Arc<dyn IdentityClient>,
    profiles: Arc<dyn ProfileStore>,
    store: IdentityStateStore,
    navigator: Arc<dyn Navigator>,
    config: ReconcilerConfig,
    epoch: AtomicU64,
    write_gate: Mutex<()>,
}

/// Owner of a reconciler's bootstrap and event-loop tasks.
///
/// Dropping the handle aborts both, which also drops the event receiver -
/// unsubscription is tied to the handle's lifetime so nothing keeps writing
/// into a torn-down store.
pub struct ReconcilerHandle {
    reconciler: Arc<SessionReconciler>,
    bootstrap: JoinHandle<()>,
    event_loop: JoinHandle<()>,
}

impl SessionReconciler {
    /// Start reconciling: subscribe to the provider's event stream, then run
    /// the bootstrap sequence and the event loop concurrently.
    pub fn spawn(
        client: Arc<dyn IdentityClient>,
        profiles: Arc<dyn ProfileStore>,
        store: IdentityStateStore,
        navigator: Arc<dyn Navigator>,
        config: ReconcilerConfig,
    ) -> ReconcilerHandle {
        // Subscribe before bootstrap starts so no event can slip between.
        let events = client.subscribe();

        let reconciler = Arc::new(Self {
            client,
            profiles,
            store,
            navigator,
            config,
            epoch: AtomicU64::new(0),
            write_gate: Mutex::new(()),
        });

        // Claim the bootstrap sequence number eagerly: any state-changing
        // live event is, by definition, newer than the bootstrap in
        // progress.
        let bootstrap_seq = reconciler.next_seq();

        let bootstrap = tokio::spawn({
            let reconciler = Arc::clone(&reconciler);
            async move { reconciler.bootstrap(bootstrap_seq).await }
        });

        let event_loop = tokio::spawn({
            let reconciler = Arc::clone(&reconciler);
            async move { reconciler.run_events(events).await }
        });

        ReconcilerHandle {
            reconciler,
            bootstrap,
            event_loop,
        }
    }

    /// One-time startup resolution.
    async fn bootstrap(&self, seq: u64) {
        log::debug!("session bootstrap started (seq {})", seq);

        match self
            .with_timeout("session fetch", self.client.current_session())
            .await
        {
            Err(e) if e.is_token_error() => {
                log::warn!("stale refresh token at bootstrap, wiping local session: {}", e);
                self.wipe_local_session(seq).await;
            }
            Err(e) => {
                log::warn!("session bootstrap failed: {}", e);
                self.guarded_clear(seq).await;
            }
            Ok(None) => {
                log::info!("no session at bootstrap");
                self.guarded_clear(seq).await;
            }
            Ok(Some(session)) => {
                log::info!("session found at bootstrap for user {}", session.user.id);
                // The user lands immediately; the loading state ends when
                // profile resolution writes its outcome.
                self.guarded_set_user(seq, session.user.clone()).await;
                if let Err(e) = self.resolve_profile(seq, &session.user).await {
                    log::warn!("stale refresh token during bootstrap profile resolution: {}", e);
                    self.wipe_local_session(seq).await;
                }
            }
        }
    }

    /// Long-lived event loop over the provider subscription.
    async fn run_events(&self, mut events: broadcast::Receiver<AuthChange>) {
        loop {
            match events.recv().await {
                Ok(change) => {
                    if let Err(e) = self.handle_change(change).await {
                        // Never leave partial state behind a failed handler.
                        log::error!("auth change handling failed, clearing session state: {}", e);
                        let seq = self.next_seq();
                        self.guarded_clear(seq).await;
                        if e.is_token_error() {
                            if let Err(e) = self.client.sign_out().await {
                                log::warn!("provider sign-out during wipe failed: {}", e);
                            }
                        }
                    }
                }
                Err(RecvError::Lagged(missed)) => {
                    log::warn!("auth event stream lagged, missed {} events", missed);
                }
                Err(RecvError::Closed) => {
                    log::debug!("auth event stream closed");
                    break;
                }
            }
        }
    }

    /// Single reducer for every provider lifecycle event.
    async fn handle_change(&self, change: AuthChange) -> AuthResult<()> {
        log::debug!("auth change {}", change.kind.as_str());

        match (change.kind, change.session) {
            // Startup resolution is owned by the bootstrap sequence; acting
            // on the provider's replay here would double the startup work.
            // The replay claims no sequence number either: it writes
            // nothing, and bumping the epoch would stale out bootstrap
            // writes still in flight, pinning the store in its loading
            // state.
            (AuthChangeKind::Bootstrapped, _) => {}

            (AuthChangeKind::SignedOut, _) => {
                let seq = self.next_seq();
                self.guarded_clear(seq).await;
                self.navigator.navigate(self.config.signout_route);
            }

            (AuthChangeKind::SignedIn | AuthChangeKind::TokenRefreshed, Some(session)) => {
                // A refresh re-resolves the profile too: a long-lived session
                // may be holding stale role data.
                let seq = self.next_seq();
                self.guarded_set_user(seq, session.user.clone()).await;
                self.resolve_profile(seq, &session.user).await?;
            }

            (AuthChangeKind::SignedIn | AuthChangeKind::TokenRefreshed, None) => {
                let seq = self.next_seq();
                self.guarded_clear(seq).await;
                self.navigator.navigate(self.config.signout_route);
            }
        }

        Ok(())
    }

    /// Fetch, synthesize or give up on the profile, then write the outcome.
    ///
    /// Errs only on a token-flavored failure, which the caller escalates to
    /// a full local wipe; everything else resolves to a profile or `None`.
    async fn resolve_profile(&self, seq: u64, user: &UserAccount) -> AuthResult<()> {
        let resolved = self.fetch_or_synthesize(user).await?;
        self.guarded_set_profile(seq, resolved).await;
        Ok(())
    }

    async fn fetch_or_synthesize(&self, user: &UserAccount) -> AuthResult<Option<Profile>> {
        let policy = RetryPolicy::fixed(
            self.config.profile_fetch_attempts,
            self.config.profile_retry_delay,
        );

        let fetched = policy
            .execute("profile fetch", AuthError::is_retryable, || {
                self.fetch_profile_once(user.id)
            })
            .await;

        match fetched {
            Ok(Some(profile)) => return Ok(Some(profile)),
            Ok(None) => {
                log::info!("no profile for user {}, synthesizing first-login profile", user.id);
            }
            Err(e) if e.is_token_error() => return Err(e),
            Err(e) => {
                log::warn!("profile fetch exhausted for user {}: {}", user.id, e);
            }
        }

        let draft = ProfileDraft::first_login(user);
        match self
            .with_timeout("profile insert", self.profiles.insert(&draft))
            .await
        {
            Ok(profile) => Ok(Some(profile)),
            Err(e) if e.is_token_error() => Err(e),
            Err(e) => {
                // A concurrent tab may have won the insert race; one more
                // fetch before giving up to an authenticated-without-role
                // state. That state is non-fatal and always non-admin.
                log::warn!("profile insert failed for user {}: {}", user.id, e);
                match self
                    .with_timeout("profile re-fetch", self.profiles.fetch_by_user_id(user.id))
                    .await
                {
                    Ok(found) => Ok(found),
                    Err(e) => {
                        log::warn!(
                            "profile re-fetch after failed insert failed for user {}: {}",
                            user.id,
                            e
                        );
                        Ok(None)
                    }
                }
            }
        }
    }

    async fn fetch_profile_once(&self, user_id: Uuid) -> AuthResult<Option<Profile>> {
        self.with_timeout("profile fetch", self.profiles.fetch_by_user_id(user_id))
            .await
    }

    /// Explicit sign-out: local state first (synchronous and final), then
    /// the provider. Provider failures are logged, never surfaced.
    pub(crate) async fn sign_out(&self) {
        let seq = self.next_seq();
        self.guarded_clear(seq).await;
        if let Err(e) = self.client.sign_out().await {
            log::warn!("provider sign-out failed: {}", e);
        }
    }

    /// Full local wipe for an unusable refresh token: drop the cached
    /// identity and tell the provider to forget the session too.
    async fn wipe_local_session(&self, seq: u64) {
        self.guarded_clear(seq).await;
        if let Err(e) = self.client.sign_out().await {
            log::warn!("provider sign-out during wipe failed: {}", e);
        }
    }

    fn next_seq(&self) -> u64 {
        self.epoch.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_stale(&self, seq: u64) -> bool {
        let current = self.epoch.load(Ordering::SeqCst);
        if current != seq {
            log::debug!("discarding stale reconcile write (seq {} < {})", seq, current);
            return true;
        }
        false
    }

    // The guarded writers serialize against each other and re-check the
    // sequence inside the critical section, so a write that passed the check
    // cannot interleave with a newer reconciliation's write.

    async fn guarded_set_user(&self, seq: u64, user: UserAccount) {
        let _write = self.write_gate.lock().await;
        if self.is_stale(seq) {
            return;
        }
        self.store.set_user(Some(user)).await;
    }

    async fn guarded_set_profile(&self, seq: u64, profile: Option<Profile>) {
        let _write = self.write_gate.lock().await;
        if self.is_stale(seq) {
            return;
        }
        self.store.set_profile(profile).await;
    }

    async fn guarded_clear(&self, seq: u64) {
        let _write = self.write_gate.lock().await;
        if self.is_stale(seq) {
            return;
        }
        self.store.clear().await;
    }

    // Not an async fn: the location must be captured in the synchronous
    // prologue, where `#[track_caller]` still sees the call site. An elapsed
    // timeout then reports which call timed out and where it was issued.
    #[track_caller]
    fn with_timeout<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = AuthResult<T>>,
    ) -> impl Future<Output = AuthResult<T>> {
        let limit = self.config.fetch_timeout;
        let location = ErrorLocation::from(Location::caller());
        async move {
            match tokio::time::timeout(limit, call).await {
                Ok(result) => result,
                Err(_elapsed) => Err(AuthError::Timeout {
                    operation,
                    timeout_secs: limit.as_secs(),
                    location,
                }),
            }
        }
    }
}

impl ReconcilerHandle {
    /// The store this reconciler writes into.
    pub fn store(&self) -> &IdentityStateStore {
        &self.reconciler.store
    }

    /// UI-facing logout.
    pub async fn sign_out(&self) {
        self.reconciler.sign_out().await;
    }

    /// Tear down the bootstrap task and the event subscription.
    pub fn shutdown(self) {
        self.bootstrap.abort();
        self.event_loop.abort();
    }
}

impl Drop for ReconcilerHandle {
    fn drop(&mut self) {
        self.bootstrap.abort();
        self.event_loop.abort();
    }
}
