use sf_auth::{
    AuthError, IdentityClient, Navigator, ProfileStore, ReconcilerConfig, Result as AuthResult,
    Route,
};
use sf_core::{AuthChange, AuthChangeKind, AuthSession, Profile, ProfileDraft, Role, UserAccount};

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::broadcast;
use uuid::Uuid;

const EVENT_CHANNEL_CAPACITY: usize = 16;

pub fn test_user() -> UserAccount {
    UserAccount {
        id: Uuid::new_v4(),
        email: "shopper@example.com".to_string(),
        display_name: Some("Sam Shopper".to_string()),
        phone: Some("+15550100".to_string()),
    }
}

pub fn test_session(user: &UserAccount) -> AuthSession {
    AuthSession::new(user.clone(), "access-token-1".to_string())
}

pub fn profile_for(user: &UserAccount, role: Role) -> Profile {
    let now = Utc::now();
    Profile {
        id: user.id,
        email: user.email.clone(),
        full_name: user.display_name.clone(),
        phone: user.phone.clone(),
        role,
        created_at: now,
        updated_at: now,
    }
}

/// Reconciler tuning for tests: short fixed retry delay, generous timeout.
pub fn reconciler_config() -> ReconcilerConfig {
    ReconcilerConfig {
        profile_fetch_attempts: 3,
        profile_retry_delay: Duration::from_millis(50),
        fetch_timeout: Duration::from_secs(10),
        signout_route: Route::SiteRoot,
    }
}

enum SessionScript {
    Session(Option<AuthSession>),
    ProviderError(String),
}

/// Scripted identity provider with a live event channel.
pub struct FakeIdentityClient {
    script: Mutex<SessionScript>,
    session_delay: Mutex<Duration>,
    events: broadcast::Sender<AuthChange>,
    session_calls: AtomicU32,
    sign_out_calls: AtomicU32,
}

impl FakeIdentityClient {
    pub fn with_session(session: Option<AuthSession>) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Arc::new(Self {
            script: Mutex::new(SessionScript::Session(session)),
            session_delay: Mutex::new(Duration::ZERO),
            events,
            session_calls: AtomicU32::new(0),
            sign_out_calls: AtomicU32::new(0),
        })
    }

    pub fn with_provider_error(message: &str) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Arc::new(Self {
            script: Mutex::new(SessionScript::ProviderError(message.to_string())),
            session_delay: Mutex::new(Duration::ZERO),
            events,
            session_calls: AtomicU32::new(0),
            sign_out_calls: AtomicU32::new(0),
        })
    }

    /// Make `current_session` slow, for mid-bootstrap race scenarios.
    pub fn set_session_delay(&self, delay: Duration) {
        *self.session_delay.lock().unwrap() = delay;
    }

    /// Deliver a lifecycle event to every subscribed reconciler.
    pub fn emit(&self, kind: AuthChangeKind, session: Option<AuthSession>) {
        let _ = self.events.send(AuthChange::new(kind, session));
    }

    pub fn session_calls(&self) -> u32 {
        self.session_calls.load(Ordering::SeqCst)
    }

    pub fn sign_out_calls(&self) -> u32 {
        self.sign_out_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityClient for FakeIdentityClient {
    async fn current_session(&self) -> AuthResult<Option<AuthSession>> {
        self.session_calls.fetch_add(1, Ordering::SeqCst);

        let delay = *self.session_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match &*self.script.lock().unwrap() {
            SessionScript::Session(session) => Ok(session.clone()),
            SessionScript::ProviderError(message) => Err(AuthError::provider(message.clone())),
        }
    }

    async fn current_user(&self) -> AuthResult<Option<UserAccount>> {
        match &*self.script.lock().unwrap() {
            SessionScript::Session(session) => Ok(session.as_ref().map(|s| s.user.clone())),
            SessionScript::ProviderError(message) => Err(AuthError::provider(message.clone())),
        }
    }

    async fn sign_out(&self) -> AuthResult<()> {
        self.sign_out_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthChange> {
        self.events.subscribe()
    }
}

/// Profile store with real row semantics plus scriptable failures.
///
/// Queued failures are consumed one per call; once drained, fetches and
/// inserts behave like a healthy store.
#[derive(Default)]
pub struct FakeProfileStore {
    rows: Mutex<HashMap<Uuid, Profile>>,
    fetch_failures: Mutex<VecDeque<String>>,
    insert_failures: Mutex<VecDeque<String>>,
    fetch_calls: AtomicU32,
    insert_calls: AtomicU32,
}

impl FakeProfileStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_profile(profile: Profile) -> Arc<Self> {
        let store = Self::default();
        store.rows.lock().unwrap().insert(profile.id, profile);
        Arc::new(store)
    }

    pub fn queue_fetch_failure(&self, message: &str) {
        self.fetch_failures
            .lock()
            .unwrap()
            .push_back(message.to_string());
    }

    pub fn queue_insert_failure(&self, message: &str) {
        self.insert_failures
            .lock()
            .unwrap()
            .push_back(message.to_string());
    }

    pub fn fetch_calls(&self) -> u32 {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn insert_calls(&self) -> u32 {
        self.insert_calls.load(Ordering::SeqCst)
    }

    pub fn row(&self, user_id: Uuid) -> Option<Profile> {
        self.rows.lock().unwrap().get(&user_id).cloned()
    }

    /// Upsert a row directly, bypassing the insert counter. Models writes
    /// made by another client (e.g. a second tab, or an upstream promotion).
    pub fn put_row(&self, profile: Profile) {
        self.rows.lock().unwrap().insert(profile.id, profile);
    }
}

#[async_trait]
impl ProfileStore for FakeProfileStore {
    async fn fetch_by_user_id(&self, user_id: Uuid) -> AuthResult<Option<Profile>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = self.fetch_failures.lock().unwrap().pop_front() {
            return Err(AuthError::transport(message));
        }

        Ok(self.rows.lock().unwrap().get(&user_id).cloned())
    }

    async fn insert(&self, draft: &ProfileDraft) -> AuthResult<Profile> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = self.insert_failures.lock().unwrap().pop_front() {
            return Err(AuthError::profile_insert(message));
        }

        let now = Utc::now();
        let profile = Profile {
            id: draft.id,
            email: draft.email.clone(),
            full_name: Some(draft.full_name.clone()),
            phone: Some(draft.phone.clone()),
            role: draft.role,
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().insert(profile.id, profile.clone());

        Ok(profile)
    }
}

/// Records every redirect this subsystem requests.
#[derive(Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.routes.lock().unwrap().push(route);
    }
}
