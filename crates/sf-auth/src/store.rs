use crate::PersistedIdentityCache;

use sf_core::{AuthSnapshot, CachedIdentity, Profile, UserAccount};

use std::sync::Arc;

use tokio::sync::{RwLock, broadcast};

const CHANGE_CHANNEL_CAPACITY: usize = 32;

/// Reactive holder of the reconciled identity.
///
/// Wraps the persisted cache: construction rehydrates synchronously (a
/// returning user never flashes logged-out while bootstrap runs) and every
/// mutation persists the partial view back. The customer-facing and
/// admin-facing stores are two instances of this type with separate caches;
/// nothing is shared between them.
pub struct IdentityStateStore {
    inner: Arc<RwLock<AuthSnapshot>>,
    cache: Arc<dyn PersistedIdentityCache>,
    changes: broadcast::Sender<AuthSnapshot>,
}

impl IdentityStateStore {
    pub fn new(cache: Arc<dyn PersistedIdentityCache>) -> Self {
        let initial = match cache.read() {
            Ok(Some(record)) => record.into_snapshot(),
            Ok(None) => AuthSnapshot::default(),
            Err(e) => {
                log::warn!("identity cache rehydration failed, starting clean: {}", e);
                AuthSnapshot::default()
            }
        };

        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);

        Self {
            inner: Arc::new(RwLock::new(initial)),
            cache,
            changes,
        }
    }

    pub async fn snapshot(&self) -> AuthSnapshot {
        self.inner.read().await.clone()
    }

    /// Subscribe to state changes. Every mutation delivers the full
    /// post-mutation snapshot.
    pub fn subscribe(&self) -> broadcast::Receiver<AuthSnapshot> {
        self.changes.subscribe()
    }

    /// Set or clear the identity. `is_authenticated` is recomputed in the
    /// same update, and clearing the user clears the profile with it.
    ///
    /// Deliberately leaves `is_loading` alone: setting the user is only half
    /// of a resolution, the loading state ends when the profile write lands.
    pub async fn set_user(&self, user: Option<UserAccount>) {
        let snapshot = {
            let mut guard = self.inner.write().await;
            guard.is_authenticated = user.is_some();
            if user.is_none() {
                guard.profile = None;
            }
            guard.user = user;
            guard.clone()
        };

        self.persist(&snapshot);
        self.notify(snapshot);
    }

    /// Record the outcome of a profile resolution. This is the terminal
    /// signal of "resolution attempt finished" and always ends the loading
    /// state, profile or not.
    pub async fn set_profile(&self, profile: Option<Profile>) {
        let snapshot = {
            let mut guard = self.inner.write().await;
            // A role must never be readable off a signed-out identity.
            guard.profile = if guard.user.is_some() { profile } else { None };
            guard.is_loading = false;
            guard.clone()
        };

        self.persist(&snapshot);
        self.notify(snapshot);
    }

    /// Sign-out: full default state, cache dropped. Synchronous and final -
    /// never re-enters the loading state.
    pub async fn clear(&self) {
        let snapshot = {
            let mut guard = self.inner.write().await;
            *guard = AuthSnapshot::signed_out();
            guard.clone()
        };

        if let Err(e) = self.cache.clear() {
            log::warn!("identity cache clear failed: {}", e);
        }
        self.notify(snapshot);
    }

    pub async fn is_admin(&self) -> bool {
        self.inner.read().await.is_admin()
    }

    pub async fn is_customer(&self) -> bool {
        self.inner.read().await.is_customer()
    }

    fn persist(&self, snapshot: &AuthSnapshot) {
        let record = CachedIdentity::from_snapshot(snapshot);
        if let Err(e) = self.cache.write(&record) {
            log::warn!("identity cache write failed: {}", e);
        }
    }

    fn notify(&self, snapshot: AuthSnapshot) {
        // No receivers is fine; consumers subscribe on demand.
        let _ = self.changes.send(snapshot);
    }
}

impl Clone for IdentityStateStore {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            cache: Arc::clone(&self.cache),
            changes: self.changes.clone(),
        }
    }
}
