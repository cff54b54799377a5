pub mod memory;
pub mod sqlite;

pub use memory::MemoryStateStore;
pub use sqlite::SqliteStateStore;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;

/// Keys of the persisted state entries
pub mod keys {
    pub const BALANCE: &str = "balance";
    pub const USER_NAME: &str = "userName";
    pub const SAVED_SLIPS: &str = "savedSlips";
    pub const SAVED_MATCHES: &str = "savedMatches";
}

/// Durable key-value storage for serialized state
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Raw value stored under `key`
    async fn load(&self, key: &str) -> Result<Option<String>>;

    /// Insert or replace a single entry
    async fn save(&self, key: &str, value: &str) -> Result<()>;

    /// Insert or replace several entries atomically
    async fn save_all(&self, entries: &[(&str, String)]) -> Result<()>;

    /// Remove an entry, no-op if absent
    async fn remove(&self, key: &str) -> Result<()>;
}

/// Load and decode a JSON entry, falling back to `None` when it is missing,
/// unreadable or corrupt
pub async fn load_json<T: DeserializeOwned>(store: &dyn StateStore, key: &str) -> Option<T> {
    let raw = match store.load(key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!("Failed to read {} from state store: {}", key, e);
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Discarding corrupt {} entry: {}", key, e);
            None
        }
    }
}

/// Encode a value for storage
pub fn to_json<T: Serialize>(key: &str, value: &T) -> Result<String> {
    serde_json::to_string(value).with_context(|| format!("Failed to serialize {}", key))
}

/// Encode and store a value under `key`
pub async fn save_json<T: Serialize>(store: &dyn StateStore, key: &str, value: &T) -> Result<()> {
    let raw = to_json(key, value)?;
    store.save(key, &raw).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[tokio::test]
    async fn test_load_json_missing_is_none() {
        let store = MemoryStateStore::new();
        let value: Option<Vec<u32>> = load_json(&store, "nothing").await;
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_load_json_corrupt_is_none() {
        let store = MemoryStateStore::new();
        store.save(keys::SAVED_SLIPS, "{not json").await.unwrap();

        let value: Option<Vec<u32>> = load_json(&store, keys::SAVED_SLIPS).await;
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_save_then_load_json() {
        let store = MemoryStateStore::new();
        let mut map = BTreeMap::new();
        map.insert("2024-01-01".to_string(), vec![1, 2, 3]);

        save_json(&store, keys::SAVED_MATCHES, &map).await.unwrap();
        let back: Option<BTreeMap<String, Vec<u32>>> =
            load_json(&store, keys::SAVED_MATCHES).await;

        assert_eq!(back, Some(map));
    }
}
