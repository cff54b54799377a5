use std::str::FromStr;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};
use tracing::{debug, info};

use super::StateStore;

/// SQLite-backed key-value store for persisted app state
pub struct SqliteStateStore {
    pool: Pool<Sqlite>,
}

impl SqliteStateStore {
    /// Create a new state store and initialize the database
    pub async fn new(database_url: &str) -> Result<Self> {
        let in_memory = database_url.contains(":memory:");

        // Create data directory if needed
        if !in_memory {
            if let Some(path) = database_url.strip_prefix("sqlite:") {
                if let Some(parent) = std::path::Path::new(path).parent() {
                    if !parent.as_os_str().is_empty() {
                        std::fs::create_dir_all(parent)
                            .context("Failed to create database directory")?;
                    }
                }
            }
        }

        // Parse connection options and enable create_if_missing
        let options = SqliteConnectOptions::from_str(database_url)
            .context("Invalid database URL")?
            .create_if_missing(true);

        // Every connection to :memory: opens its own database, so keep exactly one alive
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .context("Failed to connect to database")?;

        let store = Self { pool };
        store.init_schema().await?;

        info!("State store initialized");
        Ok(store)
    }

    /// Initialize database schema
    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kv_state (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create kv_state table")?;

        Ok(())
    }
}

const UPSERT: &str = r#"
    INSERT INTO kv_state (key, value, updated_at)
    VALUES (?, ?, ?)
    ON CONFLICT(key) DO UPDATE SET
        value = excluded.value,
        updated_at = excluded.updated_at
"#;

#[async_trait]
impl StateStore for SqliteStateStore {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM kv_state WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Failed to load state entry {}", key))?;

        Ok(row.map(|r| r.0))
    }

    async fn save(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(UPSERT)
            .bind(key)
            .bind(value)
            .bind(Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to save state entry {}", key))?;

        debug!("Saved state entry {} ({} bytes)", key, value.len());
        Ok(())
    }

    async fn save_all(&self, entries: &[(&str, String)]) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin state transaction")?;

        let updated_at = Utc::now().to_rfc3339();

        for (key, value) in entries {
            sqlx::query(UPSERT)
                .bind(*key)
                .bind(value)
                .bind(&updated_at)
                .execute(&mut *tx)
                .await
                .with_context(|| format!("Failed to save state entry {}", key))?;
        }

        tx.commit()
            .await
            .context("Failed to commit state transaction")?;

        debug!("Saved {} state entries", entries.len());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM kv_state WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to remove state entry {}", key))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_store() -> SqliteStateStore {
        SqliteStateStore::new("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let store = memory_store().await;

        assert_eq!(store.load("balance").await.unwrap(), None);

        store.save("balance", "1000.0").await.unwrap();
        store.save("balance", "950.0").await.unwrap();

        assert_eq!(store.load("balance").await.unwrap().as_deref(), Some("950.0"));
    }

    #[tokio::test]
    async fn test_save_all_writes_every_entry() {
        let store = memory_store().await;

        store
            .save_all(&[("balance", "950.0".to_string()), ("savedSlips", "[]".to_string())])
            .await
            .unwrap();

        assert_eq!(store.load("balance").await.unwrap().as_deref(), Some("950.0"));
        assert_eq!(store.load("savedSlips").await.unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_remove() {
        let store = memory_store().await;

        store.save("userName", "\"sam\"").await.unwrap();
        store.remove("userName").await.unwrap();
        store.remove("userName").await.unwrap();

        assert_eq!(store.load("userName").await.unwrap(), None);
    }
}
