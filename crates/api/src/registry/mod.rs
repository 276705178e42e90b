//! Tenant registry
//!
//! The authoritative directory mapping subdomain names to tenant records,
//! backed by a key-value store. The store itself enforces no uniqueness;
//! callers that need create-once semantics use the registry's atomic
//! `create_if_absent`.

mod store;
mod tenants;

pub use store::{KvStore, MemoryStore, RedisStore, StoreError};
pub use tenants::{RegistryError, TenantRegistry, SUBDOMAIN_KEY_PREFIX};
