//! In-memory tenant listing cache with TTL
//!
//! Caches the administrative tenant listing to avoid a full key-space scan
//! on every dashboard render. Invalidated by the tenant management layer
//! whenever a tenant is created or deleted.

use std::sync::RwLock;
use std::time::{Duration, Instant};

use metashark_shared::TenantRecord;

/// Default cache TTL
const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60);

struct CacheEntry {
    tenants: Vec<TenantRecord>,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        Instant::now() > self.expires_at
    }
}

/// Thread-safe listing cache
pub struct ListingCache {
    entry: RwLock<Option<CacheEntry>>,
    ttl: Duration,
}

impl Default for ListingCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ListingCache {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_CACHE_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entry: RwLock::new(None),
            ttl,
        }
    }

    /// Get the cached listing, if present and fresh.
    pub fn get(&self) -> Option<Vec<TenantRecord>> {
        let guard = self.entry.read().ok()?;
        let entry = guard.as_ref()?;
        if entry.is_expired() {
            None
        } else {
            Some(entry.tenants.clone())
        }
    }

    /// Cache a fresh listing.
    pub fn set(&self, tenants: Vec<TenantRecord>) {
        if let Ok(mut guard) = self.entry.write() {
            *guard = Some(CacheEntry {
                tenants,
                expires_at: Instant::now() + self.ttl,
            });
        }
    }

    /// Drop the cached listing.
    pub fn invalidate(&self) {
        if let Ok(mut guard) = self.entry.write() {
            *guard = None;
        }
    }
}
