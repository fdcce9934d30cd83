//! # Repository Module
//!
//! Typed access to the stand's persisted documents.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repositories over one store                          │
//! │                                                                         │
//! │  Controller                                                            │
//! │       │  inventory.load() / sales.save(&ledger) / settings.load_rate() │
//! │       ▼                                                                 │
//! │  InventoryRepository   chicha_inventory     JSON  → Catalog            │
//! │  SalesRepository       chicha_sales         JSON  → Vec<Sale>          │
//! │  SettingsRepository    dolce_exchange_rate  text  → ExchangeRate       │
//! │                        dolce_fusion_logo    text  → String             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Arc<dyn KeyValueStore>  (SqliteStore or MemoryStore)                  │
//! │                                                                         │
//! │  Loads never fail: missing or unreadable data yields the default and   │
//! │  a log line. Saves return DbResult so the caller can log the failure.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod inventory;
pub mod sales;
pub mod settings;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{DbError, DbResult};
use crate::store::KeyValueStore;

/// Storage key for the product catalog.
pub const INVENTORY_KEY: &str = "chicha_inventory";

/// Storage key for the sales ledger.
pub const SALES_KEY: &str = "chicha_sales";

/// Storage key for the active exchange rate.
pub const EXCHANGE_RATE_KEY: &str = "dolce_exchange_rate";

/// Storage key for the brand logo.
pub const LOGO_KEY: &str = "dolce_fusion_logo";

/// Loads a raw value, turning storage errors into "nothing stored".
async fn load_raw(store: &dyn KeyValueStore, key: &str) -> Option<String> {
    match store.load(key).await {
        Ok(Some(value)) => Some(value),
        Ok(None) => {
            info!(key = %key, "Nothing stored yet, using defaults");
            None
        }
        Err(e) => {
            warn!(key = %key, error = %e, "Could not read stored value, using defaults");
            None
        }
    }
}

/// Loads and parses a JSON document; `None` when missing or unreadable.
async fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = load_raw(store, key).await?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key = %key, error = %e, "Stored value is corrupt, using defaults");
            None
        }
    }
}

async fn save_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> DbResult<()> {
    let json = serde_json::to_string(value).map_err(|e| DbError::serialization(key, e))?;
    store.save(key, &json).await
}
