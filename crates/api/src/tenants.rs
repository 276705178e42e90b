//! Tenant management
//!
//! The orchestration layer between administrative actions and the registry:
//! field validation, conflict detection, listing cache invalidation, and
//! the single bounded retry permitted on store-connectivity failures. The
//! registry itself never retries.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use metashark_shared::{CoreError, TenantRecord};
use tokio_retry::{strategy::FixedInterval, RetryIf};

use crate::registry::TenantRegistry;
use crate::routing::ListingCache;

/// Minimum subdomain length
const MIN_SUBDOMAIN_LEN: usize = 3;

/// Delay before the one retry allowed on an unavailable store
const RETRY_DELAY: Duration = Duration::from_millis(100);

/// Validate a subdomain against the naming rule: at least three characters,
/// lowercase ASCII letters, digits and hyphens only.
pub fn validate_subdomain(subdomain: &str) -> Result<(), CoreError> {
    if subdomain.len() < MIN_SUBDOMAIN_LEN {
        return Err(CoreError::Validation(format!(
            "Subdomain must be at least {MIN_SUBDOMAIN_LEN} characters"
        )));
    }
    if !subdomain
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(CoreError::Validation(
            "Only lowercase letters, digits and hyphens are allowed".to_string(),
        ));
    }
    Ok(())
}

/// Orchestrates registry writes on behalf of administrative actions
#[derive(Clone)]
pub struct TenantManager {
    registry: TenantRegistry,
    listing: Arc<ListingCache>,
}

impl TenantManager {
    pub fn new(registry: TenantRegistry, listing: Arc<ListingCache>) -> Self {
        Self { registry, listing }
    }

    /// Create a tenant.
    ///
    /// Validation happens before any store traffic. The write is a single
    /// atomic create-if-absent, so two concurrent creates for the same name
    /// cannot both win; the loser gets a conflict and the stored record is
    /// untouched.
    pub async fn create_tenant(
        &self,
        subdomain: &str,
        icon: &str,
    ) -> Result<TenantRecord, CoreError> {
        validate_subdomain(subdomain)?;
        if icon.trim().is_empty() {
            return Err(CoreError::Validation("Icon is required".to_string()));
        }

        let created_at = Utc::now().timestamp_millis();

        let created = RetryIf::spawn(
            retry_once(),
            || async {
                self.registry
                    .create_if_absent(subdomain, icon, created_at)
                    .await
                    .map_err(CoreError::from)
            },
            retry_on_unavailable,
        )
        .await?;

        if !created {
            tracing::warn!("subdomain '{subdomain}' already exists");
            return Err(CoreError::Conflict(
                "This subdomain is already in use".to_string(),
            ));
        }

        tracing::info!("subdomain '{subdomain}' created");
        self.listing.invalidate();

        Ok(TenantRecord {
            subdomain: subdomain.to_string(),
            icon: icon.to_string(),
            created_at,
        })
    }

    /// Delete a tenant. Returns whether the record existed; an absent
    /// record is a normal outcome, distinct from a store error.
    pub async fn delete_tenant(&self, subdomain: &str) -> Result<bool, CoreError> {
        let removed = RetryIf::spawn(
            retry_once(),
            || async {
                self.registry
                    .delete(subdomain)
                    .await
                    .map_err(CoreError::from)
            },
            retry_on_unavailable,
        )
        .await?;

        if removed {
            tracing::info!("subdomain '{subdomain}' deleted");
        } else {
            tracing::warn!("delete of unknown subdomain '{subdomain}'");
        }
        self.listing.invalidate();
        Ok(removed)
    }

    /// The administrative listing, via the TTL cache. Order comes from the
    /// registry and is stable across calls within one data snapshot.
    pub async fn list_tenants(&self) -> Result<Vec<TenantRecord>, CoreError> {
        if let Some(cached) = self.listing.get() {
            return Ok(cached);
        }

        let records = self.registry.list_all().await?;
        self.listing.set(records.clone());
        Ok(records)
    }

    /// Availability pre-check for the admin form. Advisory only: creation
    /// itself relies on the atomic write, not on this answer.
    pub async fn subdomain_available(&self, subdomain: &str) -> Result<bool, CoreError> {
        validate_subdomain(subdomain)?;
        Ok(!self.registry.exists(subdomain).await?)
    }
}

impl From<crate::registry::RegistryError> for CoreError {
    fn from(err: crate::registry::RegistryError) -> Self {
        match err {
            crate::registry::RegistryError::Unavailable(msg) => CoreError::RegistryUnavailable(msg),
        }
    }
}

/// One bounded retry, nothing more.
fn retry_once() -> std::iter::Take<FixedInterval> {
    FixedInterval::new(RETRY_DELAY).take(1)
}

fn retry_on_unavailable(err: &CoreError) -> bool {
    err.is_unavailable()
}
