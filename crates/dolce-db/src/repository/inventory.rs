//! # Inventory Repository
//!
//! Persists the product catalog as one JSON array.

use std::sync::Arc;
use tracing::debug;

use dolce_core::Catalog;

use super::{load_json, save_json, INVENTORY_KEY};
use crate::error::DbResult;
use crate::store::KeyValueStore;

/// Repository for the product catalog.
#[derive(Clone)]
pub struct InventoryRepository {
    store: Arc<dyn KeyValueStore>,
}

impl InventoryRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        InventoryRepository { store }
    }

    /// The saved catalog, or the default menu if none is readable.
    pub async fn load(&self) -> Catalog {
        match load_json::<Catalog>(self.store.as_ref(), INVENTORY_KEY).await {
            Some(catalog) => {
                debug!(products = catalog.len(), "Inventory loaded");
                catalog
            }
            None => Catalog::with_defaults(),
        }
    }

    /// Overwrites the saved catalog.
    pub async fn save(&self, catalog: &Catalog) -> DbResult<()> {
        debug!(products = catalog.len(), "Saving inventory");
        save_json(self.store.as_ref(), INVENTORY_KEY, catalog).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use dolce_core::{Money, Product};

    #[tokio::test]
    async fn test_missing_inventory_uses_defaults() {
        let repo = InventoryRepository::new(Arc::new(MemoryStore::new()));
        let catalog = repo.load().await;
        assert_eq!(catalog.len(), Catalog::with_defaults().len());
    }

    #[tokio::test]
    async fn test_corrupt_inventory_uses_defaults() {
        let store = MemoryStore::with_entries([(INVENTORY_KEY, "{not json")]);
        let repo = InventoryRepository::new(Arc::new(store));
        assert!(!repo.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let repo = InventoryRepository::new(Arc::new(MemoryStore::new()));
        let product = Product::new("Chicha de Maíz", Money::from_cents(275), "Chichas", None);
        let catalog = Catalog::from_products(vec![product.clone()]);

        repo.save(&catalog).await.unwrap();
        let loaded = repo.load().await;
        assert_eq!(loaded.products(), &[product]);
    }

    #[tokio::test]
    async fn test_reads_hand_written_inventory() {
        let raw = r#"[
            {"id":"p1","name":"Chicha Clásica","priceUSD":2.5,"category":"Chichas"},
            {"id":"p2","name":"Golfeado","priceUSD":3,"category":"Dulces","description":"Con queso"}
        ]"#;
        let store = MemoryStore::with_entries([(INVENTORY_KEY, raw)]);
        let repo = InventoryRepository::new(Arc::new(store));

        let catalog = repo.load().await;
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("p1").unwrap().price_usd, Money::from_cents(250));
        assert_eq!(catalog.get("p2").unwrap().price_usd, Money::from_cents(300));
        assert_eq!(catalog.get("p2").unwrap().description.as_deref(), Some("Con queso"));
    }

    #[tokio::test]
    async fn test_saved_inventory_uses_dollar_numbers() {
        let store = Arc::new(MemoryStore::new());
        let repo = InventoryRepository::new(store.clone());
        let product = Product::new("Chicha", Money::from_cents(275), "Chichas", None);
        repo.save(&Catalog::from_products(vec![product])).await.unwrap();

        let raw = store.load(INVENTORY_KEY).await.unwrap().unwrap();
        assert!(raw.contains(r#""priceUSD":2.75"#), "{}", raw);
    }

    #[tokio::test]
    async fn test_empty_saved_catalog_stays_empty() {
        let store = MemoryStore::with_entries([(INVENTORY_KEY, "[]")]);
        let repo = InventoryRepository::new(Arc::new(store));
        assert!(repo.load().await.is_empty());
    }
}
