//! # Daily Close
//!
//! Aggregates one local calendar day of sales into the closing summary.
//!
//! ## Aggregation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sales (newest first)                                                  │
//! │      │                                                                  │
//! │      ▼  keep sale.local_date(tz) == day                                │
//! │  ┌───────────────────┬──────────────────────┬────────────────────────┐ │
//! │  │ per product       │ per payment method   │ grand totals           │ │
//! │  │ qty, USD, VES     │ count, USD, VES      │ count, USD, VES        │ │
//! │  │ VES at each       │ all four methods,    │ average ticket =       │ │
//! │  │ sale's own rate   │ zeros included       │ USD / count (0 if 0)   │ │
//! │  │ sorted by qty ↓   │                      │                        │ │
//! │  └───────────────────┴──────────────────────┴────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The zone is a parameter: the stand passes `chrono::Local`, tests pass a
//! fixed offset.

use chrono::{NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::{PaymentMethod, Sale};

// =============================================================================
// Summary Types
// =============================================================================

/// One product's line on the closing report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub product_id: String,
    /// Name as recorded on the first sale of the day that had it.
    pub name: String,
    pub quantity: i64,
    pub total_usd: Money,
    pub total_ves: Money,
}

/// One payment method's line on the closing report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodSummary {
    pub method: PaymentMethod,
    pub count: usize,
    pub total_usd: Money,
    pub total_ves: Money,
}

/// The closing summary for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub date: NaiveDate,
    pub sales_count: usize,
    pub total_usd: Money,
    pub total_ves: Money,
    pub average_ticket: Money,
    /// Best sellers first.
    pub products: Vec<ProductSummary>,
    /// Always four entries, in [`PaymentMethod::ALL`] order.
    pub payment_methods: Vec<MethodSummary>,
}

impl DailySummary {
    /// The entry for one method.
    pub fn method(&self, method: PaymentMethod) -> Option<&MethodSummary> {
        self.payment_methods.iter().find(|m| m.method == method)
    }
}

// =============================================================================
// Aggregation
// =============================================================================

/// Sales whose local calendar date is `date`.
pub fn sales_on<'a, Tz: TimeZone>(
    sales: &'a [Sale],
    date: NaiveDate,
    tz: &'a Tz,
) -> impl Iterator<Item = &'a Sale> + 'a {
    sales
        .iter()
        .filter(move |sale| sale.local_date(tz) == Some(date))
}

/// Builds the closing summary for `date` in zone `tz`.
///
/// ## Example
/// ```rust
/// use chrono::{NaiveDate, Utc};
/// use dolce_core::report::daily_close;
///
/// let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
/// let summary = daily_close(&[], today, &Utc);
/// assert_eq!(summary.sales_count, 0);
/// assert!(summary.average_ticket.is_zero());
/// assert_eq!(summary.payment_methods.len(), 4);
/// ```
pub fn daily_close<Tz: TimeZone>(sales: &[Sale], date: NaiveDate, tz: &Tz) -> DailySummary {
    let mut products: Vec<ProductSummary> = Vec::new();
    let mut methods: Vec<MethodSummary> = PaymentMethod::ALL
        .into_iter()
        .map(|method| MethodSummary {
            method,
            count: 0,
            total_usd: Money::zero(),
            total_ves: Money::zero(),
        })
        .collect();

    let mut sales_count = 0;
    let mut total_usd = Money::zero();
    let mut total_ves = Money::zero();

    for sale in sales_on(sales, date, tz) {
        sales_count += 1;
        total_usd += sale.total_usd;
        total_ves += sale.total_ves;

        if let Some(entry) = methods.iter_mut().find(|m| m.method == sale.payment_method) {
            entry.count += 1;
            entry.total_usd += sale.total_usd;
            entry.total_ves += sale.total_ves;
        }

        for item in &sale.items {
            let item_ves = sale.exchange_rate.to_ves(item.total_usd);
            match products.iter_mut().find(|p| p.product_id == item.product_id) {
                Some(entry) => {
                    entry.quantity += item.quantity;
                    entry.total_usd += item.total_usd;
                    entry.total_ves += item_ves;
                }
                None => products.push(ProductSummary {
                    product_id: item.product_id.clone(),
                    name: item.name.clone(),
                    quantity: item.quantity,
                    total_usd: item.total_usd,
                    total_ves: item_ves,
                }),
            }
        }
    }

    // Stable: ties keep first-seen order.
    products.sort_by(|a, b| b.quantity.cmp(&a.quantity));

    DailySummary {
        date,
        sales_count,
        total_usd,
        total_ves,
        average_ticket: total_usd.average_over(sales_count),
        products,
        payment_methods: methods,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::ExchangeRate;
    use crate::types::SaleItem;
    use chrono::{FixedOffset, NaiveDateTime};

    fn caracas() -> FixedOffset {
        FixedOffset::west_opt(4 * 3600).unwrap()
    }

    fn at(date: &str) -> i64 {
        let naive = NaiveDateTime::parse_from_str(date, "%Y-%m-%d %H:%M").unwrap();
        caracas()
            .from_local_datetime(&naive)
            .single()
            .unwrap()
            .timestamp_millis()
    }

    fn item(product_id: &str, quantity: i64, price_cents: i64) -> SaleItem {
        SaleItem {
            product_id: product_id.to_string(),
            name: format!("Product {}", product_id),
            quantity,
            price_usd: Money::from_cents(price_cents),
            total_usd: Money::from_cents(price_cents * quantity),
        }
    }

    fn sale(timestamp: i64, method: PaymentMethod, rate: &str, items: Vec<SaleItem>) -> Sale {
        let rate: ExchangeRate = rate.parse().unwrap();
        let total_usd: Money = items.iter().map(|i| i.total_usd).sum();
        Sale {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp,
            items,
            total_usd,
            total_ves: rate.to_ves(total_usd),
            exchange_rate: rate,
            payment_method: method,
            reference: None,
        }
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_only_today_counts() {
        let sales = vec![
            sale(at("2024-03-02 09:00"), PaymentMethod::CashUsd, "40", vec![item("a", 1, 1000)]),
            sale(at("2024-03-01 21:00"), PaymentMethod::CashUsd, "40", vec![item("a", 1, 500)]),
        ];

        let summary = daily_close(&sales, day("2024-03-02"), &caracas());
        assert_eq!(summary.sales_count, 1);
        assert_eq!(summary.total_usd.cents(), 1000);
        assert_eq!(summary.average_ticket.cents(), 1000);
    }

    #[test]
    fn test_day_boundary_uses_zone() {
        // 23:30 in Caracas is already the next day in UTC.
        let sales = vec![sale(
            at("2024-03-01 23:30"),
            PaymentMethod::Card,
            "40",
            vec![item("a", 1, 100)],
        )];

        assert_eq!(daily_close(&sales, day("2024-03-01"), &caracas()).sales_count, 1);
        let utc = FixedOffset::east_opt(0).unwrap();
        assert_eq!(daily_close(&sales, day("2024-03-02"), &utc).sales_count, 1);
    }

    #[test]
    fn test_empty_day() {
        let summary = daily_close(&[], day("2024-03-02"), &caracas());
        assert_eq!(summary.sales_count, 0);
        assert_eq!(summary.average_ticket, Money::zero());
        assert!(summary.products.is_empty());
        assert_eq!(summary.payment_methods.len(), 4);
        assert!(summary.payment_methods.iter().all(|m| m.count == 0));
    }

    #[test]
    fn test_per_product_uses_each_sales_rate() {
        let sales = vec![
            sale(at("2024-03-02 10:00"), PaymentMethod::CashVes, "40", vec![item("a", 1, 100)]),
            sale(at("2024-03-02 11:00"), PaymentMethod::CashVes, "50", vec![item("a", 1, 100)]),
        ];

        let summary = daily_close(&sales, day("2024-03-02"), &caracas());
        let a = &summary.products[0];
        assert_eq!(a.quantity, 2);
        assert_eq!(a.total_usd.cents(), 200);
        assert_eq!(a.total_ves.cents(), 9000);
        assert_eq!(summary.total_ves.cents(), 9000);
    }

    #[test]
    fn test_products_sorted_by_quantity_stable() {
        let sales = vec![sale(
            at("2024-03-02 10:00"),
            PaymentMethod::CashUsd,
            "40",
            vec![item("x", 1, 100), item("y", 3, 100), item("z", 1, 100)],
        )];

        let summary = daily_close(&sales, day("2024-03-02"), &caracas());
        let order: Vec<&str> = summary.products.iter().map(|p| p.product_id.as_str()).collect();
        assert_eq!(order, vec!["y", "x", "z"]);
    }

    #[test]
    fn test_payment_method_breakdown() {
        let sales = vec![
            sale(at("2024-03-02 10:00"), PaymentMethod::PagoMovil, "40", vec![item("a", 2, 250)]),
            sale(at("2024-03-02 10:05"), PaymentMethod::PagoMovil, "40", vec![item("b", 1, 100)]),
            sale(at("2024-03-02 10:10"), PaymentMethod::CashUsd, "40", vec![item("b", 1, 100)]),
        ];

        let summary = daily_close(&sales, day("2024-03-02"), &caracas());
        let pm = summary.method(PaymentMethod::PagoMovil).unwrap();
        assert_eq!(pm.count, 2);
        assert_eq!(pm.total_usd.cents(), 600);
        assert_eq!(pm.total_ves.cents(), 24000);
        assert_eq!(summary.method(PaymentMethod::Card).unwrap().count, 0);

        // 700 / 3 = 233.33 cents, rounded.
        assert_eq!(summary.average_ticket.cents(), 233);
        let counted: usize = summary.payment_methods.iter().map(|m| m.count).sum();
        assert_eq!(counted, summary.sales_count);
    }
}
