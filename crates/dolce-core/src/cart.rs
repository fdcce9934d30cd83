//! # Cart
//!
//! The sale being rung up, and the checkout that freezes it into a [`Sale`].
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Operator Action          Operation               Cart Change           │
//! │  ───────────────          ─────────               ───────────           │
//! │                                                                         │
//! │  Tap product ────────────► add_item() ──────────► new row, or qty += 1  │
//! │                                                                         │
//! │  Press + / - ────────────► update_quantity() ───► qty += Δ, clamped     │
//! │                                                 to [1, 999]             │
//! │                                                                         │
//! │  Press remove ───────────► remove_item() ───────► row deleted           │
//! │                                                                         │
//! │  Pick payment ───────────► checkout() ──────────► Sale snapshot,        │
//! │                                                 cart emptied            │
//! │                                                                         │
//! │  NOTE: checkout on an empty cart returns None and changes nothing.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::currency::ExchangeRate;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{PaymentMethod, Product, Sale, SaleItem};
use crate::validation::normalize_reference;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// The shopping cart.
///
/// ## Invariants
/// - Rows are unique by `product_id` (adding the same product bumps quantity)
/// - Every row has `1 <= quantity <= 999`
/// - At most 100 rows
/// - Every row satisfies `total_usd == price_usd × quantity`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    items: Vec<SaleItem>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Rows in the order they were first added.
    pub fn items(&self) -> &[SaleItem] {
        &self.items
    }

    /// Adds one unit of a product.
    ///
    /// ## Behavior
    /// - Product already in cart: quantity + 1
    /// - Otherwise: new row with quantity 1, name and price snapshotted
    ///
    /// ## Errors
    /// - [`CoreError::NotSellable`] if the price is not positive
    /// - [`CoreError::QuantityTooLarge`] if the row is already at 999
    /// - [`CoreError::CartTooLarge`] if a 101st row would be created
    pub fn add_item(&mut self, product: &Product) -> CoreResult<()> {
        if !product.is_sellable() {
            return Err(CoreError::NotSellable {
                name: product.name.clone(),
            });
        }

        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product.id) {
            let new_qty = item.quantity + 1;
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            item.set_quantity(new_qty);
            return Ok(());
        }

        if self.items.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }

        self.items.push(SaleItem::from_product(product));
        Ok(())
    }

    /// Changes a row's quantity by `delta`, clamping to `[1, 999]`.
    ///
    /// An unknown product id is a no-op. Returns whether a row was found.
    pub fn update_quantity(&mut self, product_id: &str, delta: i64) -> bool {
        let Some(item) = self.items.iter_mut().find(|i| i.product_id == product_id) else {
            return false;
        };

        let new_qty = item
            .quantity
            .saturating_add(delta)
            .clamp(1, MAX_ITEM_QUANTITY);
        item.set_quantity(new_qty);
        true
    }

    /// Removes a row. Returns whether one was removed.
    pub fn remove_item(&mut self, product_id: &str) -> bool {
        let initial_len = self.items.len();
        self.items.retain(|i| i.product_id != product_id);
        self.items.len() != initial_len
    }

    /// Clears all items from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Freezes the cart into a sale and empties it.
    ///
    /// `now_ms` is the sale timestamp in epoch milliseconds; the caller
    /// owns the clock. The reference survives only for Pago Móvil.
    ///
    /// ## Returns
    /// - `Ok(None)` for an empty cart (nothing happens)
    /// - `Ok(Some(sale))` otherwise
    /// - `Err` if the reference is invalid; the cart is left untouched
    pub fn checkout(
        &mut self,
        method: PaymentMethod,
        reference: Option<&str>,
        rate: ExchangeRate,
        now_ms: i64,
    ) -> CoreResult<Option<Sale>> {
        if self.is_empty() {
            return Ok(None);
        }

        let reference = normalize_reference(method, reference)?;
        let total_usd = self.total_usd();

        let sale = Sale {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: now_ms,
            items: std::mem::take(&mut self.items),
            total_usd,
            total_ves: rate.to_ves(total_usd),
            exchange_rate: rate,
            payment_method: method,
            reference,
        };

        Ok(Some(sale))
    }

    /// Returns the number of rows in the cart.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the total quantity of all items.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Σ line totals in USD.
    pub fn total_usd(&self) -> Money {
        self.items.iter().map(|i| i.total_usd).sum()
    }

    /// The USD total at the given rate (live, not frozen).
    pub fn total_ves(&self, rate: ExchangeRate) -> Money {
        rate.to_ves(self.total_usd())
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_product(id: &str, price_cents: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            price_usd: Money::from_cents(price_cents),
            category: "Chichas".to_string(),
            description: None,
        }
    }

    fn rate() -> ExchangeRate {
        "45.50".parse().unwrap()
    }

    #[test]
    fn test_cart_add_same_product_twice() {
        let mut cart = Cart::new();
        let product = test_product("1", 250);

        cart.add_item(&product).unwrap();
        cart.add_item(&product).unwrap();

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.items()[0].quantity, 2);
        assert_eq!(cart.items()[0].total_usd.cents(), 500);
    }

    #[test]
    fn test_oversized_stored_price_saturates() {
        // Hand-edited inventory can bypass the product form's price cap.
        let mut cart = Cart::new();
        let product = test_product("big", i64::MAX);

        cart.add_item(&product).unwrap();
        cart.add_item(&product).unwrap();
        cart.add_item(&test_product("2", 250)).unwrap();

        assert_eq!(cart.items()[0].total_usd.cents(), i64::MAX);
        assert_eq!(cart.total_usd().cents(), i64::MAX);
    }

    #[test]
    fn test_cart_rejects_unpriced_product() {
        let mut cart = Cart::new();
        let err = cart.add_item(&test_product("free", 0)).unwrap_err();
        assert!(matches!(err, CoreError::NotSellable { .. }));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_clamps_to_one() {
        let mut cart = Cart::new();
        let product = test_product("1", 250);
        for _ in 0..3 {
            cart.add_item(&product).unwrap();
        }

        assert!(cart.update_quantity("1", -100));
        assert_eq!(cart.items()[0].quantity, 1);
        assert_eq!(cart.items()[0].total_usd.cents(), 250);

        assert!(cart.update_quantity("1", 5000));
        assert_eq!(cart.items()[0].quantity, MAX_ITEM_QUANTITY);
    }

    #[test]
    fn test_update_unknown_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(&test_product("1", 250)).unwrap();
        let before = cart.clone();

        assert!(!cart.update_quantity("nope", 1));
        assert!(!cart.remove_item("nope"));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_add_item_limits() {
        let mut cart = Cart::new();
        let product = test_product("1", 100);
        cart.add_item(&product).unwrap();
        cart.update_quantity("1", MAX_ITEM_QUANTITY);

        assert!(matches!(
            cart.add_item(&product),
            Err(CoreError::QuantityTooLarge { .. })
        ));

        let mut cart = Cart::new();
        for i in 0..MAX_CART_ITEMS {
            cart.add_item(&test_product(&i.to_string(), 100)).unwrap();
        }
        assert!(matches!(
            cart.add_item(&test_product("extra", 100)),
            Err(CoreError::CartTooLarge { .. })
        ));
    }

    #[test]
    fn test_totals() {
        let mut cart = Cart::new();
        cart.add_item(&test_product("1", 250)).unwrap();
        cart.add_item(&test_product("1", 250)).unwrap();
        cart.add_item(&test_product("2", 150)).unwrap();

        assert_eq!(cart.total_quantity(), 3);
        assert_eq!(cart.total_usd().cents(), 650);
        assert_eq!(cart.total_ves(rate()).cents(), 29575);
    }

    #[test]
    fn test_checkout_builds_sale_and_clears() {
        let mut cart = Cart::new();
        cart.add_item(&test_product("1", 250)).unwrap();
        cart.add_item(&test_product("2", 210)).unwrap();
        cart.update_quantity("2", 1);

        let sale = cart
            .checkout(PaymentMethod::PagoMovil, Some(" 04121234 "), rate(), 1_700_000_000_000)
            .unwrap()
            .unwrap();

        assert!(cart.is_empty());
        assert_eq!(sale.timestamp, 1_700_000_000_000);
        assert_eq!(sale.total_usd, sale.items.iter().map(|i| i.total_usd).sum::<Money>());
        assert_eq!(sale.total_usd.cents(), 670);
        assert_eq!(sale.total_ves, rate().to_ves(sale.total_usd));
        assert_eq!(sale.total_ves.cents(), 30485);
        assert_eq!(sale.exchange_rate, rate());
        assert_eq!(sale.reference.as_deref(), Some("04121234"));
        for item in &sale.items {
            assert_eq!(item.total_usd, item.price_usd * item.quantity);
        }
    }

    #[test]
    fn test_checkout_drops_reference_for_other_methods() {
        let mut cart = Cart::new();
        cart.add_item(&test_product("1", 250)).unwrap();

        let sale = cart
            .checkout(PaymentMethod::CashUsd, Some("1234"), rate(), 0)
            .unwrap()
            .unwrap();
        assert_eq!(sale.reference, None);
    }

    #[test]
    fn test_checkout_empty_cart_is_noop() {
        let mut cart = Cart::new();
        let result = cart.checkout(PaymentMethod::Card, None, rate(), 0).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_checkout_rejects_bad_reference_keeps_cart() {
        let mut cart = Cart::new();
        cart.add_item(&test_product("1", 250)).unwrap();

        let long = "9".repeat(60);
        assert!(cart
            .checkout(PaymentMethod::PagoMovil, Some(&long), rate(), 0)
            .is_err());
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_snapshot_survives_product_change() {
        let mut cart = Cart::new();
        let mut product = test_product("1", 250);
        cart.add_item(&product).unwrap();

        product.name = "Renamed".to_string();
        product.price_usd = Money::from_cents(999);

        let sale = cart.checkout(PaymentMethod::Card, None, rate(), 0).unwrap().unwrap();
        assert_eq!(sale.items[0].name, "Product 1");
        assert_eq!(sale.items[0].price_usd.cents(), 250);
    }
}
