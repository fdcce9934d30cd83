//! # dolce-db: Persistence for the Dolce Stand
//!
//! Stores the stand's four documents (catalog, sales ledger, exchange rate,
//! logo) in a key-value table inside a local SQLite file.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Dolce Stand Data Flow                            │
//! │                                                                         │
//! │  Controller (dolce-stand)                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     dolce-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │  Repositories │    │     Store     │    │   Database   │  │   │
//! │  │   │               │    │               │    │  (pool.rs)   │  │   │
//! │  │   │ Inventory     │───►│ KeyValueStore │───►│ SqlitePool   │  │   │
//! │  │   │ Sales         │    │ SqliteStore   │    │ Migrations   │  │   │
//! │  │   │ Settings      │    │ MemoryStore   │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (kv_store table)                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use dolce_db::{Database, DbConfig, InventoryRepository};
//!
//! # async fn run() -> Result<(), dolce_db::DbError> {
//! let db = Database::new(DbConfig::new("dolce.db")).await?;
//! let inventory = InventoryRepository::new(Arc::new(db.store()));
//! let catalog = inventory.load().await;
//! inventory.save(&catalog).await?;
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use store::{KeyValueStore, MemoryStore, SqliteStore};

pub use repository::inventory::InventoryRepository;
pub use repository::sales::SalesRepository;
pub use repository::settings::{SettingsRepository, DEFAULT_LOGO_URL};
