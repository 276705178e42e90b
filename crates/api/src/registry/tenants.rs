//! Tenant registry over the key-value store
//!
//! Storage layout: key `subdomain:<name>`, value `{"emoji": "...",
//! "createdAt": <millis>}`. There is no secondary index; `list_all` is a
//! full scan under the prefix.

use std::sync::Arc;

use metashark_shared::TenantRecord;
use serde::{Deserialize, Serialize};

use super::store::{KvStore, StoreError};

/// Key prefix for tenant records in the store
pub const SUBDOMAIN_KEY_PREFIX: &str = "subdomain:";

/// On-the-wire record layout. Kept separate from [`TenantRecord`] so the
/// stored format stays stable independently of the domain type.
#[derive(Debug, Serialize, Deserialize)]
struct StoredTenant {
    emoji: String,
    #[serde(rename = "createdAt")]
    created_at: i64,
}

/// Errors surfaced by registry operations
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Underlying store unreachable. Never retried inside the registry.
    #[error("Registry unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for RegistryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(msg) => RegistryError::Unavailable(msg),
        }
    }
}

/// The authoritative directory of tenant records, keyed by subdomain
#[derive(Clone)]
pub struct TenantRegistry {
    store: Arc<dyn KvStore>,
}

impl TenantRegistry {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    fn key(subdomain: &str) -> String {
        format!("{SUBDOMAIN_KEY_PREFIX}{subdomain}")
    }

    /// Look up a tenant. Absence is a normal outcome, not an error.
    pub async fn get(&self, subdomain: &str) -> Result<Option<TenantRecord>, RegistryError> {
        let raw = self.store.get(&Self::key(subdomain)).await?;
        Ok(raw.and_then(|value| decode_record(subdomain, &value)))
    }

    pub async fn exists(&self, subdomain: &str) -> Result<bool, RegistryError> {
        Ok(self.store.get(&Self::key(subdomain)).await?.is_some())
    }

    /// Unconditional overwrite at the storage layer. Uniqueness is the
    /// caller's concern; prefer [`Self::create_if_absent`] for create-once
    /// semantics.
    pub async fn put(
        &self,
        subdomain: &str,
        icon: &str,
        created_at: i64,
    ) -> Result<(), RegistryError> {
        let value = encode_record(icon, created_at)?;
        self.store.set(&Self::key(subdomain), &value).await?;
        Ok(())
    }

    /// Atomic single-key conditional write. Returns whether the record was
    /// created; `false` means the subdomain already existed and the stored
    /// record is untouched.
    pub async fn create_if_absent(
        &self,
        subdomain: &str,
        icon: &str,
        created_at: i64,
    ) -> Result<bool, RegistryError> {
        let value = encode_record(icon, created_at)?;
        Ok(self.store.set_nx(&Self::key(subdomain), &value).await?)
    }

    /// Idempotent delete: returns whether the record existed. The subdomain
    /// becomes immediately available for re-creation.
    pub async fn delete(&self, subdomain: &str) -> Result<bool, RegistryError> {
        Ok(self.store.del(&Self::key(subdomain)).await?)
    }

    /// All tenant records in deterministic order: creation time ascending,
    /// subdomain as tie-break. The store itself returns keys unordered.
    pub async fn list_all(&self) -> Result<Vec<TenantRecord>, RegistryError> {
        let pairs = self.store.scan_prefix(SUBDOMAIN_KEY_PREFIX).await?;

        let mut records: Vec<TenantRecord> = pairs
            .into_iter()
            .filter_map(|(key, value)| {
                let subdomain = key.strip_prefix(SUBDOMAIN_KEY_PREFIX)?;
                decode_record(subdomain, &value)
            })
            .collect();

        records.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.subdomain.cmp(&b.subdomain))
        });
        Ok(records)
    }

    /// Store connectivity probe for readiness checks.
    pub async fn ping(&self) -> Result<(), RegistryError> {
        Ok(self.store.ping().await?)
    }
}

fn encode_record(icon: &str, created_at: i64) -> Result<String, RegistryError> {
    serde_json::to_string(&StoredTenant {
        emoji: icon.to_string(),
        created_at,
    })
    .map_err(|e| RegistryError::Unavailable(format!("record encoding failed: {e}")))
}

/// Decode a stored record; corrupt values are skipped with a warning rather
/// than failing the whole operation.
fn decode_record(subdomain: &str, value: &str) -> Option<TenantRecord> {
    match serde_json::from_str::<StoredTenant>(value) {
        Ok(stored) => Some(TenantRecord {
            subdomain: subdomain.to_string(),
            icon: stored.emoji,
            created_at: stored.created_at,
        }),
        Err(e) => {
            tracing::warn!("skipping corrupt tenant record for '{subdomain}': {e}");
            None
        }
    }
}
