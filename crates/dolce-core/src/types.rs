//! # Domain Types
//!
//! Core domain types used throughout the Dolce stand.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │    SaleItem     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  product_id     │       │
//! │  │  name           │   │  timestamp (ms) │   │  name (frozen)  │       │
//! │  │  price_usd      │   │  total_usd/ves  │   │  price (frozen) │       │
//! │  │  category       │   │  exchange_rate  │   │  quantity       │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────┐       │
//! │  │  PaymentMethod: CASH_USD │ CASH_VES │ PAGO_MOVIL │ CARD     │       │
//! │  └─────────────────────────────────────────────────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A [`SaleItem`] copies the product's name and price when it enters the
//! cart. `product_id` is only a historical pointer: deleting or repricing the
//! product later never touches recorded sales.
//!
//! ## Persisted Shape
//! Field names serialize in camelCase, except the currency-suffixed amounts
//! which keep an upper-case suffix (`priceUSD`, `totalUSD`, `totalVES`).
//! Amounts and the rate are JSON numbers in major units:
//! ```text
//! {"id":"…","name":"Chicha","priceUSD":2.5,"category":"Chichas"}
//! {"id":"…","timestamp":1700000000000,"items":[…],"totalUSD":2.5,
//!  "totalVES":113.75,"exchangeRate":45.5,"paymentMethod":"CASH_USD"}
//! ```

use chrono::{NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::currency::ExchangeRate;
use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A drink (or snack) the stand sells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier (UUID v4), stable after creation.
    pub id: String,

    /// Display name shown on the POS grid and in reports.
    pub name: String,

    /// Price in US cents. Must be positive for the product to be sellable.
    #[serde(rename = "priceUSD")]
    pub price_usd: Money,

    /// Free-form category used by the POS tabs.
    pub category: String,

    /// Optional marketing copy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Product {
    /// Creates a product with a freshly generated id.
    pub fn new(
        name: impl Into<String>,
        price_usd: Money,
        category: impl Into<String>,
        description: Option<String>,
    ) -> Self {
        Product {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            price_usd,
            category: category.into(),
            description,
        }
    }

    /// Only positively priced products can go into a cart.
    #[inline]
    pub fn is_sellable(&self) -> bool {
        self.price_usd.is_positive()
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer paid. Closed set; reports always list all four.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// US dollar bills.
    CashUsd,
    /// Bolívar bills.
    CashVes,
    /// Mobile bank transfer; the only method that carries a reference.
    PagoMovil,
    /// Card on the point-of-sale terminal.
    Card,
}

impl PaymentMethod {
    /// Every method, in the order reports list them.
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::CashUsd,
        PaymentMethod::CashVes,
        PaymentMethod::PagoMovil,
        PaymentMethod::Card,
    ];

    /// Label printed on screen and on the closing report.
    pub const fn label(&self) -> &'static str {
        match self {
            PaymentMethod::CashUsd => "Divisas $",
            PaymentMethod::CashVes => "Efectivo Bs.",
            PaymentMethod::PagoMovil => "Pago Móvil",
            PaymentMethod::Card => "Punto Venta",
        }
    }

    /// Wire name, as persisted.
    pub const fn code(&self) -> &'static str {
        match self {
            PaymentMethod::CashUsd => "CASH_USD",
            PaymentMethod::CashVes => "CASH_VES",
            PaymentMethod::PagoMovil => "PAGO_MOVIL",
            PaymentMethod::Card => "CARD",
        }
    }

    /// Whether a transfer reference is kept for this method.
    #[inline]
    pub const fn takes_reference(&self) -> bool {
        matches!(self, PaymentMethod::PagoMovil)
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepts the wire name in any case, with `-` or `_` (`pago-movil`).
impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace('-', "_");
        PaymentMethod::ALL
            .into_iter()
            .find(|m| m.code() == normalized)
            .ok_or_else(|| ValidationError::InvalidFormat {
                field: "payment method".to_string(),
                reason: format!(
                    "unknown method '{}', expected one of cash-usd, cash-ves, pago-movil, card",
                    s.trim()
                ),
            })
    }
}

// =============================================================================
// Sale Item
// =============================================================================

/// A line of a cart or a recorded sale.
///
/// Invariant: `total_usd == price_usd × quantity`. The cart keeps it when it
/// changes a quantity; use [`SaleItem::set_quantity`] rather than touching
/// the field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub product_id: String,
    /// Product name at time of sale (frozen).
    pub name: String,
    pub quantity: i64,
    /// Unit price at time of sale (frozen).
    #[serde(rename = "priceUSD")]
    pub price_usd: Money,
    #[serde(rename = "totalUSD")]
    pub total_usd: Money,
}

impl SaleItem {
    /// Snapshots a product into a single-unit line.
    pub fn from_product(product: &Product) -> Self {
        SaleItem {
            product_id: product.id.clone(),
            name: product.name.clone(),
            quantity: 1,
            price_usd: product.price_usd,
            total_usd: product.price_usd,
        }
    }

    /// Sets the quantity and recomputes the line total.
    pub fn set_quantity(&mut self, quantity: i64) {
        self.quantity = quantity;
        self.total_usd = self.price_usd.multiply_quantity(quantity);
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A completed, immutable sale. Only deletion changes the ledger afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,
    /// Creation time, milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub items: Vec<SaleItem>,
    #[serde(rename = "totalUSD")]
    pub total_usd: Money,
    /// `total_usd × exchange_rate`, rounded to the céntimo.
    #[serde(rename = "totalVES")]
    pub total_ves: Money,
    /// The rate in force when the sale was recorded.
    pub exchange_rate: ExchangeRate,
    pub payment_method: PaymentMethod,
    /// Pago Móvil transfer reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl Sale {
    /// Calendar date of the sale in the given time zone.
    ///
    /// `None` only for timestamps chrono cannot represent.
    pub fn local_date<Tz: TimeZone>(&self, tz: &Tz) -> Option<NaiveDate> {
        tz.timestamp_millis_opt(self.timestamp)
            .single()
            .map(|dt| dt.date_naive())
    }

    /// Number of units across all lines.
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn chicha() -> Product {
        Product::new("Chicha Clásica", Money::from_cents(250), "Chichas", None)
    }

    #[test]
    fn test_product_new_generates_uuid() {
        let a = chicha();
        let b = chicha();
        assert_ne!(a.id, b.id);
        assert!(uuid::Uuid::parse_str(&a.id).is_ok());
        assert!(a.is_sellable());
    }

    #[test]
    fn test_zero_price_not_sellable() {
        let mut product = chicha();
        product.price_usd = Money::zero();
        assert!(!product.is_sellable());
    }

    #[test]
    fn test_sale_item_snapshot_and_total() {
        let product = chicha();
        let mut item = SaleItem::from_product(&product);
        assert_eq!(item.quantity, 1);
        assert_eq!(item.total_usd, product.price_usd);

        item.set_quantity(4);
        assert_eq!(item.total_usd.cents(), 1000);
        assert_eq!(item.name, "Chicha Clásica");
    }

    #[test]
    fn test_payment_method_labels_and_parsing() {
        assert_eq!(PaymentMethod::CashUsd.label(), "Divisas $");
        assert_eq!(PaymentMethod::Card.to_string(), "Punto Venta");
        assert_eq!("pago-movil".parse::<PaymentMethod>().unwrap(), PaymentMethod::PagoMovil);
        assert_eq!("CASH_VES".parse::<PaymentMethod>().unwrap(), PaymentMethod::CashVes);
        assert!("bitcoin".parse::<PaymentMethod>().is_err());
        assert!(PaymentMethod::PagoMovil.takes_reference());
        assert!(!PaymentMethod::Card.takes_reference());
    }

    #[test]
    fn test_sale_json_shape() {
        let sale = Sale {
            id: "s-1".to_string(),
            timestamp: 1_700_000_000_000,
            items: vec![SaleItem::from_product(&chicha())],
            total_usd: Money::from_cents(250),
            total_ves: Money::from_cents(11375),
            exchange_rate: ExchangeRate::default(),
            payment_method: PaymentMethod::PagoMovil,
            reference: Some("0412".to_string()),
        };

        let json = serde_json::to_value(&sale).unwrap();
        assert_eq!(json["paymentMethod"], "PAGO_MOVIL");
        assert_eq!(json["totalUSD"], 2.5);
        assert_eq!(json["totalVES"], 113.75);
        assert_eq!(json["exchangeRate"], 45.5);
        assert_eq!(json["items"][0]["productId"], sale.items[0].product_id.as_str());
        assert_eq!(json["items"][0]["priceUSD"], 2.5);
        assert_eq!(json["items"][0]["totalUSD"], 2.5);

        let back: Sale = serde_json::from_value(json).unwrap();
        assert_eq!(back, sale);
    }

    #[test]
    fn test_reads_hand_written_product() {
        let product: Product = serde_json::from_str(
            r#"{"id":"a","name":"Chicha","priceUSD":2.5,"category":"Chichas"}"#,
        )
        .unwrap();
        assert_eq!(product.price_usd, Money::from_cents(250));
        assert_eq!(product.description, None);

        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["priceUSD"], 2.5);
        assert!(json.get("priceUsd").is_none());
    }

    #[test]
    fn test_local_date_respects_offset() {
        // 2023-11-15 02:00 UTC is still the 14th in Caracas (UTC-4).
        let sale = Sale {
            id: "s".to_string(),
            timestamp: 1_700_013_600_000,
            items: vec![],
            total_usd: Money::zero(),
            total_ves: Money::zero(),
            exchange_rate: ExchangeRate::default(),
            payment_method: PaymentMethod::Card,
            reference: None,
        };
        let caracas = FixedOffset::west_opt(4 * 3600).unwrap();
        let utc = FixedOffset::east_opt(0).unwrap();

        assert_eq!(sale.local_date(&utc), NaiveDate::from_ymd_opt(2023, 11, 15));
        assert_eq!(sale.local_date(&caracas), NaiveDate::from_ymd_opt(2023, 11, 14));
    }
}
