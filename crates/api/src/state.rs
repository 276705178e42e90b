//! Shared application state

use std::sync::Arc;

use metashark_shared::CoreError;

use crate::auth::{AuthGate, CredentialStore, SessionManager};
use crate::config::Config;
use crate::registry::{KvStore, TenantRegistry};
use crate::routing::ListingCache;
use crate::tenants::TenantManager;

/// Application state shared across all request handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub registry: TenantRegistry,
    pub tenants: TenantManager,
    pub gate: AuthGate,
}

impl AppState {
    /// Wire the application from its seams: the key-value store backing the
    /// registry and the credential store backing the gate.
    pub fn new(
        config: Config,
        store: Arc<dyn KvStore>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Result<Self, CoreError> {
        let registry = TenantRegistry::new(store);
        let listing = Arc::new(ListingCache::with_ttl(std::time::Duration::from_secs(
            config.listing_cache_ttl_secs,
        )));
        let tenants = TenantManager::new(registry.clone(), listing);

        let sessions = SessionManager::new(&config.session_secret, config.session_expiry_hours);
        let gate = AuthGate::new(credentials, sessions)?;

        Ok(Self {
            config: Arc::new(config),
            registry,
            tenants,
            gate,
        })
    }
}
