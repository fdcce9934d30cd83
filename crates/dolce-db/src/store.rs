//! # Key-Value Store
//!
//! The persistence seam: a string-keyed document store.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  trait KeyValueStore                                                    │
//! │      load(key)        -> Option<String>                                 │
//! │      save(key, value)                                                   │
//! │                                                                         │
//! │  ├── SqliteStore   kv_store table, one row per key (the stand)          │
//! │  └── MemoryStore   HashMap behind an async RwLock (tests, dry runs)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Values are opaque text. Parsing and fallbacks live in the repositories.

use async_trait::async_trait;
use sqlx::SqlitePool;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::DbResult;

/// String-keyed storage for the stand's documents.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value, or `None` if the key was never saved.
    async fn load(&self, key: &str) -> DbResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn save(&self, key: &str, value: &str) -> DbResult<()>;
}

// =============================================================================
// SQLite
// =============================================================================

/// [`KeyValueStore`] over the `kv_store` table.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        SqliteStore { pool }
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn load(&self, key: &str) -> DbResult<Option<String>> {
        debug!(key = %key, "Loading value");

        let value: Option<String> = sqlx::query_scalar("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(value)
    }

    async fn save(&self, key: &str, value: &str) -> DbResult<()> {
        debug!(key = %key, bytes = value.len(), "Saving value");

        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(chrono::Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// =============================================================================
// In-Memory
// =============================================================================

/// Volatile [`KeyValueStore`]. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// A store pre-filled with raw entries.
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        MemoryStore {
            entries: RwLock::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn load(&self, key: &str) -> DbResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn save(&self, key: &str, value: &str) -> DbResult<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_sqlite_store_round_trip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let store = db.store();

        assert_eq!(store.load("dolce_exchange_rate").await.unwrap(), None);

        store.save("dolce_exchange_rate", "45.50").await.unwrap();
        store.save("dolce_exchange_rate", "46.20").await.unwrap();
        assert_eq!(
            store.load("dolce_exchange_rate").await.unwrap().as_deref(),
            Some("46.20")
        );
    }

    #[tokio::test]
    async fn test_sqlite_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dolce.db");

        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        db.store().save("dolce_fusion_logo", "https://example.com/logo.png").await.unwrap();
        db.close().await;

        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        assert_eq!(
            db.store().load("dolce_fusion_logo").await.unwrap().as_deref(),
            Some("https://example.com/logo.png")
        );
    }

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemoryStore::with_entries([("a", "1")]);
        assert_eq!(store.load("a").await.unwrap().as_deref(), Some("1"));
        assert_eq!(store.load("b").await.unwrap(), None);

        store.save("b", "2").await.unwrap();
        assert_eq!(store.load("b").await.unwrap().as_deref(), Some("2"));
    }
}
