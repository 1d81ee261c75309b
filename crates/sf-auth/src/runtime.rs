use crate::{
    AdminGate, FileIdentityCache, IdentityClient, IdentityStateStore, Navigator, ProfileStore,
    ReconcilerConfig, ReconcilerHandle, Result as AuthResult, Route, SessionReconciler,
};

use std::sync::Arc;

use sf_config::Config;

/// Composition root for the session subsystem.
///
/// Wires the two identity stores and their reconcilers. The customer-facing
/// and admin-facing sides are deliberately independent instances with
/// separate persisted records, so a failure on one side can never leak into
/// the other. Sign-out redirects differ per side: the storefront returns to
/// the site root, the back office to its own login.
pub struct AuthRuntime {
    customer: ReconcilerHandle,
    admin: ReconcilerHandle,
    navigator: Arc<dyn Navigator>,
}

impl AuthRuntime {
    pub fn start(
        client: Arc<dyn IdentityClient>,
        profiles: Arc<dyn ProfileStore>,
        navigator: Arc<dyn Navigator>,
        config: &Config,
    ) -> AuthResult<Self> {
        let customer_cache = Arc::new(FileIdentityCache::new(config.customer_cache_path()?));
        let admin_cache = Arc::new(FileIdentityCache::new(config.admin_cache_path()?));

        let customer_store = IdentityStateStore::new(customer_cache);
        let admin_store = IdentityStateStore::new(admin_cache);

        let customer = SessionReconciler::spawn(
            Arc::clone(&client),
            Arc::clone(&profiles),
            customer_store,
            Arc::clone(&navigator),
            ReconcilerConfig::new(&config.session, Route::SiteRoot),
        );

        let admin = SessionReconciler::spawn(
            client,
            profiles,
            admin_store,
            Arc::clone(&navigator),
            ReconcilerConfig::new(&config.session, Route::AdminLogin),
        );

        Ok(Self {
            customer,
            admin,
            navigator,
        })
    }

    pub fn customer_store(&self) -> &IdentityStateStore {
        self.customer.store()
    }

    pub fn admin_store(&self) -> &IdentityStateStore {
        self.admin.store()
    }

    /// A fresh gate over the admin store, one per guarded mount.
    pub fn admin_gate(&self) -> AdminGate {
        AdminGate::new(self.admin.store().clone(), Arc::clone(&self.navigator))
    }

    pub async fn sign_out_customer(&self) {
        self.customer.sign_out().await;
    }

    pub async fn sign_out_admin(&self) {
        self.admin.sign_out().await;
    }

    /// Tear down both event subscriptions.
    pub fn shutdown(self) {
        self.customer.shutdown();
        self.admin.shutdown();
    }
}
