//! # Cart Commands
//!
//! Building the current order and checking it out.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  add_to_cart(id) ×N ──► Cart rows (unique by product)                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  checkout(method, reference)                                            │
//! │       │                                                                 │
//! │       ├── empty cart ──────────────────────────► Ok(None), no-op        │
//! │       ├── reference too long ──────────────────► Err, cart untouched    │
//! │       ▼                                                                 │
//! │  Sale { totals frozen at the active rate }                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ledger.insert(0, sale) ──► persist chicha_sales                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The cart itself is never persisted.

use tracing::{debug, info};

use dolce_core::{CoreError, PaymentMethod, Sale};

use crate::controller::Controller;
use crate::error::ApiResult;

impl Controller {
    /// Adds one unit of a catalog product.
    pub fn add_to_cart(&mut self, product_id: &str) -> ApiResult<()> {
        debug!(product_id = %product_id, "add_to_cart command");

        let product = self
            .state
            .catalog
            .get(product_id)
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;

        self.state.cart.add_item(product)?;
        Ok(())
    }

    /// Changes a row's quantity by `delta`, clamped to the allowed range.
    /// Returns `false` for a product not in the cart.
    pub fn update_cart_item(&mut self, product_id: &str, delta: i64) -> bool {
        debug!(product_id = %product_id, delta, "update_cart_item command");
        self.state.cart.update_quantity(product_id, delta)
    }

    pub fn remove_from_cart(&mut self, product_id: &str) -> bool {
        debug!(product_id = %product_id, "remove_from_cart command");
        self.state.cart.remove_item(product_id)
    }

    pub fn clear_cart(&mut self) {
        debug!("clear_cart command");
        self.state.cart.clear();
    }

    /// Checks out at the current wall-clock time.
    pub async fn checkout(
        &mut self,
        method: PaymentMethod,
        reference: Option<&str>,
    ) -> ApiResult<Option<Sale>> {
        let now_ms = chrono::Utc::now().timestamp_millis();
        self.checkout_at(method, reference, now_ms).await
    }

    /// Turns the cart into a sale stamped `now_ms` and records it.
    pub async fn checkout_at(
        &mut self,
        method: PaymentMethod,
        reference: Option<&str>,
        now_ms: i64,
    ) -> ApiResult<Option<Sale>> {
        debug!(method = %method, items = self.state.cart.item_count(), "checkout command");

        let Some(sale) = self
            .state
            .cart
            .checkout(method, reference, self.state.rate, now_ms)?
        else {
            debug!("Checkout with an empty cart ignored");
            return Ok(None);
        };

        self.state.sales.insert(0, sale.clone());
        self.persist_sales().await;

        info!(
            sale_id = %sale.id,
            total_usd = %sale.total_usd,
            total_ves = %sale.total_ves,
            method = %sale.payment_method,
            "Sale recorded"
        );
        Ok(Some(sale))
    }
}
