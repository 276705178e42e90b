//! Key-value store abstraction for the tenant registry
//!
//! `RedisStore` is the production backend; `MemoryStore` backs tests and
//! store-less local development.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands};

/// Errors surfaced by a key-value backend
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<redis::RedisError> for StoreError {
    fn from(err: redis::RedisError) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}

/// Minimal key-value operations the registry needs.
///
/// `set_nx` is the single-key conditional write ("set if not exists") that
/// makes tenant creation atomic without application-level locking.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Unconditional overwrite.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Write only when the key is absent. Returns whether the write happened.
    async fn set_nx(&self, key: &str, value: &str) -> Result<bool, StoreError>;

    /// Returns whether the key existed.
    async fn del(&self, key: &str) -> Result<bool, StoreError>;

    /// Full key-space scan under a prefix; returns (key, value) pairs in
    /// store order, which is unordered.
    async fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, String)>, StoreError>;

    /// Connectivity probe for readiness checks.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Redis-backed store using a multiplexed connection manager
#[derive(Clone)]
pub struct RedisStore {
    con: ConnectionManager,
}

impl RedisStore {
    /// Connect to Redis and build the shared connection manager.
    pub async fn connect(redis_url: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        let con = ConnectionManager::new(client).await?;
        Ok(Self { con })
    }
}

#[async_trait]
impl KvStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut con = self.con.clone();
        let value: Option<String> = con.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut con = self.con.clone();
        let _: () = con.set(key, value).await?;
        Ok(())
    }

    async fn set_nx(&self, key: &str, value: &str) -> Result<bool, StoreError> {
        let mut con = self.con.clone();
        let created: bool = con.set_nx(key, value).await?;
        Ok(created)
    }

    async fn del(&self, key: &str) -> Result<bool, StoreError> {
        let mut con = self.con.clone();
        let removed: i64 = con.del(key).await?;
        Ok(removed > 0)
    }

    async fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, String)>, StoreError> {
        let mut con = self.con.clone();
        let pattern = format!("{prefix}*");

        let keys: Vec<String> = {
            let mut iter = con.scan_match(pattern).await?;
            let mut keys = Vec::new();
            while let Some(key) = iter.next_item().await {
                keys.push(key);
            }
            keys
        };

        let mut pairs = Vec::with_capacity(keys.len());
        let mut con = self.con.clone();
        for key in keys {
            // A key deleted between SCAN and GET is a normal absence
            let value: Option<String> = con.get(&key).await?;
            if let Some(value) = value {
                pairs.push((key, value));
            }
        }
        Ok(pairs)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let mut con = self.con.clone();
        let _: String = redis::cmd("PING").query_async(&mut con).await?;
        Ok(())
    }
}

/// In-memory store for tests and local development without Redis
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn set_nx(&self, key: &str, value: &str) -> Result<bool, StoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        if entries.contains_key(key) {
            return Ok(false);
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(true)
    }

    async fn del(&self, key: &str) -> Result<bool, StoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        Ok(entries.remove(key).is_some())
    }

    async fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, String)>, StoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        Ok(entries
            .iter()
            .filter(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
