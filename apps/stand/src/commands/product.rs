//! # Product Commands
//!
//! Catalog management through the product form, plus description generation.
//!
//! ## Editor Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Product Form Flow                                    │
//! │                                                                         │
//! │  open_editor(None | Some(id))  ──► ticket N issued                      │
//! │       │                                                                 │
//! │       ├── update_draft(..)        (any number of times)                 │
//! │       │                                                                 │
//! │       ├── begin_description() ──► (N, name), generating = true          │
//! │       │        ...await generator...                                    │
//! │       │   finish_description(N, text)                                   │
//! │       │        ticket still N?  YES ──► draft.description = text        │
//! │       │                         NO  ──► discarded                       │
//! │       │                                                                 │
//! │       ├── save_product() ──► validate ─┬─ Ok  ──► catalog + persist     │
//! │       │                                └─ Err ──► form stays open       │
//! │       ▼                                                                 │
//! │  close_editor() / leave Inventory  ──► ticket N retired                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::{debug, info};

use dolce_core::validation::clip_description;
use dolce_core::{CoreError, Product, ProductDraft, ValidationError};

use crate::controller::Controller;
use crate::error::{ApiError, ApiResult};
use crate::state::{ProductEditor, View};

impl Controller {
    /// Opens the product form, blank or prefilled from `product_id`.
    ///
    /// Switches to the inventory screen. Any previous form is replaced and
    /// its ticket retired.
    pub fn open_editor(&mut self, product_id: Option<&str>) -> ApiResult<u64> {
        debug!(product_id = ?product_id, "open_editor command");

        let existing = match product_id {
            Some(id) => Some(
                self.state
                    .catalog
                    .get(id)
                    .cloned()
                    .ok_or_else(|| CoreError::ProductNotFound(id.to_string()))?,
            ),
            None => None,
        };

        self.state.view = View::Inventory;
        let ticket = self.state.issue_ticket();
        self.state.editor = Some(match existing {
            Some(product) => ProductEditor::edit(ticket, &product),
            None => ProductEditor::create(ticket),
        });

        Ok(ticket)
    }

    /// Closes the form without saving.
    pub fn close_editor(&mut self) {
        if let Some(editor) = self.state.editor.take() {
            debug!(ticket = editor.ticket, "close_editor command");
        }
    }

    /// Replaces the form contents.
    pub fn update_draft(&mut self, draft: ProductDraft) -> ApiResult<()> {
        let editor = self.editor_mut()?;
        editor.draft = draft;
        Ok(())
    }

    /// Validates the form and writes it into the catalog.
    ///
    /// On a validation error nothing is saved and the form stays open.
    pub async fn save_product(&mut self) -> ApiResult<Product> {
        let rate = self.state.rate;
        let (target, draft) = {
            let editor = self.editor_mut()?;
            (editor.target.clone(), editor.draft.clone())
        };
        debug!(product_id = ?target, name = %draft.name, "save_product command");

        let product = match target {
            Some(id) => {
                let existing = self
                    .state
                    .catalog
                    .get(&id)
                    .ok_or_else(|| CoreError::ProductNotFound(id.clone()))?;
                let updated = draft.apply_to(existing, rate)?;
                self.state.catalog.update(updated.clone());
                updated
            }
            None => {
                let product = draft.build(rate)?;
                self.state.catalog.add(product.clone())?;
                product
            }
        };

        self.state.editor = None;
        self.persist_catalog().await;

        info!(product_id = %product.id, name = %product.name, price_usd = %product.price_usd, "Product saved");
        Ok(product)
    }

    /// Removes a product. Past sales keep their snapshots.
    pub async fn delete_product(&mut self, product_id: &str) -> ApiResult<Product> {
        debug!(product_id = %product_id, "delete_product command");

        let removed = self
            .state
            .catalog
            .delete(product_id)
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;

        if self
            .state
            .editor
            .as_ref()
            .is_some_and(|e| e.target.as_deref() == Some(product_id))
        {
            self.close_editor();
        }

        self.persist_catalog().await;
        info!(product_id = %removed.id, name = %removed.name, "Product deleted");
        Ok(removed)
    }

    // =========================================================================
    // Description Generation
    // =========================================================================

    /// Marks the form as generating and returns what to ask for.
    ///
    /// ## Errors
    /// - No form open, or a request already in flight
    /// - The product name is empty
    pub fn begin_description(&mut self) -> ApiResult<(u64, String)> {
        let editor = self.editor_mut()?;
        if editor.generating {
            return Err(ApiError::invalid_state("A description is already being generated"));
        }

        let name = editor.draft.name.trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::Required { field: "name".into() }.into());
        }

        editor.generating = true;
        debug!(ticket = editor.ticket, name = %name, "begin_description command");
        Ok((editor.ticket, name))
    }

    /// Delivers a generated description, clipped to what the form accepts.
    /// Returns `false` (and drops the text) when the form it was requested
    /// for is no longer open.
    pub fn finish_description(&mut self, ticket: u64, text: String) -> bool {
        match self.state.editor.as_mut() {
            Some(editor) if editor.ticket == ticket => {
                editor.draft.description = Some(clip_description(&text));
                editor.generating = false;
                true
            }
            _ => {
                debug!(ticket, "Discarding description for a closed form");
                false
            }
        }
    }

    /// Requests a description for the open form and fills it in.
    pub async fn generate_description(&mut self) -> ApiResult<bool> {
        let (ticket, name) = self.begin_description()?;
        let generator = self.generator.clone();
        let text = generator.generate(&name).await;
        Ok(self.finish_description(ticket, text))
    }

    /// Generates and saves a description for an existing product.
    pub async fn describe_product(&mut self, product_id: &str) -> ApiResult<Product> {
        self.open_editor(Some(product_id))?;
        self.generate_description().await?;
        self.save_product().await
    }

    fn editor_mut(&mut self) -> ApiResult<&mut ProductEditor> {
        self.state
            .editor
            .as_mut()
            .ok_or_else(|| ApiError::invalid_state("No product form is open"))
    }
}

#[cfg(test)]
mod tests {
    use crate::controller::testing::*;
    use crate::controller::Controller;
    use crate::error::ErrorCode;
    use crate::services::DescriptionGenerator;
    use crate::state::View;
    use dolce_core::validation::MAX_DESCRIPTION_LEN;
    use dolce_core::{Currency, ExchangeRate, Money, ProductDraft};
    use dolce_db::{InventoryRepository, KeyValueStore, MemoryStore};
    use std::sync::Arc;

    fn draft(name: &str, cents: i64, currency: Currency) -> ProductDraft {
        ProductDraft {
            name: name.to_string(),
            price: Money::from_cents(cents),
            price_currency: currency,
            category: "Bebidas".to_string(),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_create_product_persists() {
        let (mut controller, store) = controller().await;
        controller.open_editor(None).unwrap();
        controller
            .update_draft(draft("Chicha de Piña", 275, Currency::Usd))
            .unwrap();

        let product = controller.save_product().await.unwrap();
        assert_eq!(product.price_usd, Money::from_cents(275));
        assert!(controller.state().editor.is_none());
        assert_eq!(controller.state().catalog.len(), 9);

        let saved = InventoryRepository::new(store as Arc<dyn KeyValueStore>).load().await;
        assert!(saved.get(&product.id).is_some());
    }

    #[tokio::test]
    async fn test_price_entered_in_ves() {
        let (mut controller, _) = controller().await;
        controller.open_editor(None).unwrap();
        controller
            .update_draft(draft("Tizana", 9100, Currency::Ves))
            .unwrap();

        let product = controller.save_product().await.unwrap();
        assert_eq!(product.price_usd, Money::from_cents(200));
    }

    #[tokio::test]
    async fn test_invalid_form_saves_nothing() {
        let (mut controller, _) = controller().await;
        controller.open_editor(None).unwrap();
        controller.update_draft(draft("   ", 100, Currency::Usd)).unwrap();

        let err = controller.save_product().await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(controller.state().catalog.len(), 8);
        assert!(controller.state().editor.is_some());

        controller.update_draft(draft("Agua", 0, Currency::Usd)).unwrap();
        assert!(controller.save_product().await.is_err());
        assert_eq!(controller.state().catalog.len(), 8);
    }

    #[tokio::test]
    async fn test_edit_keeps_id() {
        let (mut controller, _) = controller().await;
        let original = controller.state().catalog.products()[0].clone();

        controller.open_editor(Some(&original.id)).unwrap();
        let mut edited = ProductDraft::from_product(&original);
        edited.price = Money::from_cents(999);
        controller.update_draft(edited).unwrap();

        let saved = controller.save_product().await.unwrap();
        assert_eq!(saved.id, original.id);
        assert_eq!(
            controller.state().catalog.get(&original.id).unwrap().price_usd,
            Money::from_cents(999)
        );
    }

    #[tokio::test]
    async fn test_unknown_product() {
        let (mut controller, _) = controller().await;
        let err = controller.open_editor(Some("missing")).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert!(controller.delete_product("missing").await.is_err());
    }

    #[tokio::test]
    async fn test_delete_keeps_sale_snapshots() {
        let (mut controller, _) = controller().await;
        let product = controller.state().catalog.products()[0].clone();
        controller.add_to_cart(&product.id).unwrap();
        controller
            .checkout_at(dolce_core::PaymentMethod::Card, None, 1_700_000_000_000)
            .await
            .unwrap();

        controller.delete_product(&product.id).await.unwrap();
        assert!(controller.state().catalog.get(&product.id).is_none());
        let sale = &controller.state().sales[0];
        assert_eq!(sale.items[0].product_id, product.id);
        assert_eq!(sale.items[0].name, product.name);
    }

    #[tokio::test]
    async fn test_generate_description() {
        let (mut controller, _) = controller().await;
        controller.open_editor(None).unwrap();
        controller.update_draft(draft("Cocada", 250, Currency::Usd)).unwrap();

        assert!(controller.generate_description().await.unwrap());
        let editor = controller.state().editor.as_ref().unwrap();
        assert_eq!(editor.draft.description.as_deref(), Some("El mejor Cocada"));
        assert!(!editor.generating);
    }

    #[tokio::test]
    async fn test_description_requires_name_and_single_flight() {
        let (mut controller, _) = controller().await;
        assert!(controller.begin_description().is_err());

        controller.open_editor(None).unwrap();
        let err = controller.begin_description().unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        controller.update_draft(draft("Cocada", 250, Currency::Usd)).unwrap();
        controller.begin_description().unwrap();
        let err = controller.begin_description().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidState);
    }

    #[tokio::test]
    async fn test_stale_description_is_discarded() {
        let (mut controller, _) = controller().await;
        controller.open_editor(None).unwrap();
        controller.update_draft(draft("Cocada", 250, Currency::Usd)).unwrap();
        let (ticket, _) = controller.begin_description().unwrap();

        // Form closed and reopened while the request was in flight
        controller.set_view(View::Pos);
        let reopened = controller.open_editor(None).unwrap();
        assert_ne!(reopened, ticket);

        assert!(!controller.finish_description(ticket, "tarde".into()));
        let editor = controller.state().editor.as_ref().unwrap();
        assert_eq!(editor.draft.description, None);
        assert!(!editor.generating);
    }

    struct WordyGenerator;

    #[async_trait::async_trait]
    impl DescriptionGenerator for WordyGenerator {
        async fn generate(&self, _product_name: &str) -> String {
            "Refrescante. ".repeat(80)
        }
    }

    #[tokio::test]
    async fn test_long_generated_text_still_saves() {
        let store = Arc::new(MemoryStore::new());
        let mut controller =
            Controller::load(store, Arc::new(WordyGenerator), ExchangeRate::default()).await;
        let id = controller.state().catalog.products()[0].id.clone();

        let product = controller.describe_product(&id).await.unwrap();
        let description = product.description.unwrap();
        assert_eq!(description.chars().count(), MAX_DESCRIPTION_LEN);
        assert!(description.starts_with("Refrescante."));
    }

    #[tokio::test]
    async fn test_describe_product_saves_text() {
        let (mut controller, _) = controller().await;
        let id = controller.state().catalog.products()[1].id.clone();

        let product = controller.describe_product(&id).await.unwrap();
        assert_eq!(product.description.as_deref(), Some("El mejor Chicha con Arequipe"));
    }
}
