//! # Controller
//!
//! Single owner of [`AppState`]. Commands live in [`crate::commands`] as
//! further `impl Controller` blocks; this file holds loading, navigation and
//! the write-behind persistence helpers.
//!
//! ## Persistence Policy
//! ```text
//! command ──► mutate AppState ──► save document ──┬── Ok  ──► done
//!                                                 └── Err ──► error! log
//!                                                             (state kept)
//! ```

use std::sync::Arc;
use tracing::{debug, error, info};

use dolce_core::{ExchangeRate, Product};
use dolce_db::{InventoryRepository, KeyValueStore, SalesRepository, SettingsRepository};

use crate::services::DescriptionGenerator;
use crate::state::{AppState, View};

/// Owns the stand's state and its collaborators.
pub struct Controller {
    pub(crate) state: AppState,
    inventory: InventoryRepository,
    sales: SalesRepository,
    settings: SettingsRepository,
    pub(crate) generator: Arc<dyn DescriptionGenerator>,
}

impl Controller {
    /// Loads every document from `store`, falling back to defaults for
    /// anything missing or unreadable.
    pub async fn load(
        store: Arc<dyn KeyValueStore>,
        generator: Arc<dyn DescriptionGenerator>,
        default_rate: ExchangeRate,
    ) -> Self {
        let inventory = InventoryRepository::new(store.clone());
        let sales = SalesRepository::new(store.clone());
        let settings = SettingsRepository::new(store);

        let catalog = inventory.load().await;
        let ledger = sales.load().await;
        let rate = settings.load_rate(default_rate).await;
        let logo = settings.load_logo().await;

        info!(
            products = catalog.len(),
            sales = ledger.len(),
            rate = %rate,
            "Stand state loaded"
        );

        let controller = Controller {
            state: AppState::new(catalog, ledger, rate, logo),
            inventory,
            sales,
            settings,
            generator,
        };

        // Default products get their ids fixed on first run
        controller.persist_catalog().await;
        controller
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn view(&self) -> View {
        self.state.view
    }

    /// Switches screens. Leaving the inventory closes the product form.
    pub fn set_view(&mut self, view: View) {
        if self.state.view == view {
            return;
        }
        debug!(from = %self.state.view, to = %view, "set_view command");

        if !view.hosts_editor() && self.state.editor.is_some() {
            self.close_editor();
        }
        self.state.view = view;
    }

    /// Selects a POS category tab (`None` = all).
    pub fn select_category(&mut self, category: Option<String>) {
        debug!(category = ?category, "select_category command");
        self.state.category = category.filter(|c| !c.trim().is_empty());
    }

    /// Products shown under the current category tab.
    pub fn visible_products(&self) -> Vec<&Product> {
        self.state
            .catalog
            .by_category(self.state.category.as_deref())
            .collect()
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    pub(crate) async fn persist_catalog(&self) {
        if let Err(e) = self.inventory.save(&self.state.catalog).await {
            error!(error = %e, "Failed to save inventory");
        }
    }

    pub(crate) async fn persist_sales(&self) {
        if let Err(e) = self.sales.save(&self.state.sales).await {
            error!(error = %e, "Failed to save sales ledger");
        }
    }

    pub(crate) async fn persist_rate(&self) {
        if let Err(e) = self.settings.save_rate(self.state.rate).await {
            error!(error = %e, "Failed to save exchange rate");
        }
    }

    pub(crate) async fn persist_logo(&self) {
        if let Err(e) = self.settings.save_logo(&self.state.logo).await {
            error!(error = %e, "Failed to save logo");
        }
    }
}

// =============================================================================
// Test Support
// =============================================================================

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use async_trait::async_trait;
    use dolce_db::{DbError, DbResult, MemoryStore};

    /// Generator that echoes the product name.
    pub struct EchoGenerator;

    #[async_trait]
    impl DescriptionGenerator for EchoGenerator {
        async fn generate(&self, product_name: &str) -> String {
            format!("El mejor {}", product_name)
        }
    }

    /// Store whose writes always fail.
    pub struct BrokenStore;

    #[async_trait]
    impl KeyValueStore for BrokenStore {
        async fn load(&self, _key: &str) -> DbResult<Option<String>> {
            Ok(None)
        }

        async fn save(&self, _key: &str, _value: &str) -> DbResult<()> {
            Err(DbError::QueryFailed("disk full".into()))
        }
    }

    pub async fn controller_with(store: Arc<dyn KeyValueStore>) -> Controller {
        Controller::load(store, Arc::new(EchoGenerator), ExchangeRate::default()).await
    }

    pub async fn controller() -> (Controller, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (controller_with(store.clone()).await, store)
    }
}
