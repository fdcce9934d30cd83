//! # Sales Repository
//!
//! Persists the sales ledger as one JSON array, newest sale first.

use std::sync::Arc;
use tracing::debug;

use dolce_core::Sale;

use super::{load_json, save_json, SALES_KEY};
use crate::error::DbResult;
use crate::store::KeyValueStore;

/// Repository for the sales ledger.
#[derive(Clone)]
pub struct SalesRepository {
    store: Arc<dyn KeyValueStore>,
}

impl SalesRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        SalesRepository { store }
    }

    /// The saved ledger; empty if none is readable.
    pub async fn load(&self) -> Vec<Sale> {
        let sales: Vec<Sale> = load_json(self.store.as_ref(), SALES_KEY)
            .await
            .unwrap_or_default();
        debug!(sales = sales.len(), "Sales ledger loaded");
        sales
    }

    /// Overwrites the saved ledger.
    pub async fn save(&self, sales: &[Sale]) -> DbResult<()> {
        debug!(sales = sales.len(), "Saving sales ledger");
        save_json(self.store.as_ref(), SALES_KEY, sales).await
    }
}
