//! # Sales History
//!
//! Filtering of the ledger for the history view and the stats strip above it.
//!
//! Every dimension of [`SalesFilter`] is optional and they combine with AND:
//!
//! | Dimension | Matches when                                              |
//! |-----------|-----------------------------------------------------------|
//! | `search`  | any item name or the reference contains it (any case)     |
//! | `method`  | the sale was paid that way                                |
//! | `start`   | local date ≥ start                                        |
//! | `end`     | local date ≤ end                                          |

use chrono::{NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::{PaymentMethod, Sale};

/// The history view's filter bar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesFilter {
    /// Free text; blank means no text constraint.
    pub search: String,
    /// `None` is "all methods".
    pub method: Option<PaymentMethod>,
    /// Inclusive lower bound on the local calendar date.
    pub start: Option<NaiveDate>,
    /// Inclusive upper bound on the local calendar date.
    pub end: Option<NaiveDate>,
}

impl SalesFilter {
    /// Whether a sale passes every set dimension.
    pub fn matches<Tz: TimeZone>(&self, sale: &Sale, tz: &Tz) -> bool {
        self.matches_search(sale) && self.matches_method(sale) && self.matches_dates(sale, tz)
    }

    /// Filters the ledger, keeping its order.
    pub fn apply<'a, Tz: TimeZone>(&self, sales: &'a [Sale], tz: &Tz) -> Vec<&'a Sale> {
        sales.iter().filter(|sale| self.matches(sale, tz)).collect()
    }

    fn matches_search(&self, sale: &Sale) -> bool {
        let term = self.search.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }

        sale.items
            .iter()
            .any(|item| item.name.to_lowercase().contains(&term))
            || sale
                .reference
                .as_deref()
                .is_some_and(|r| r.to_lowercase().contains(&term))
    }

    fn matches_method(&self, sale: &Sale) -> bool {
        self.method.map_or(true, |m| m == sale.payment_method)
    }

    fn matches_dates<Tz: TimeZone>(&self, sale: &Sale, tz: &Tz) -> bool {
        if self.start.is_none() && self.end.is_none() {
            return true;
        }
        let Some(date) = sale.local_date(tz) else {
            return false;
        };
        self.start.map_or(true, |start| date >= start) && self.end.map_or(true, |end| date <= end)
    }
}

/// Totals over whatever the filter kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryStats {
    pub count: usize,
    pub total_usd: Money,
    pub total_ves: Money,
}

impl HistoryStats {
    pub fn from_sales<'a>(sales: impl IntoIterator<Item = &'a Sale>) -> Self {
        sales
            .into_iter()
            .fold(HistoryStats::default(), |mut stats, sale| {
                stats.count += 1;
                stats.total_usd += sale.total_usd;
                stats.total_ves += sale.total_ves;
                stats
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::ExchangeRate;
    use crate::types::SaleItem;
    use chrono::FixedOffset;

    fn tz() -> FixedOffset {
        FixedOffset::west_opt(4 * 3600).unwrap()
    }

    fn noon(y: i32, m: u32, d: u32) -> i64 {
        tz().with_ymd_and_hms(y, m, d, 12, 0, 0)
            .single()
            .unwrap()
            .timestamp_millis()
    }

    fn sale(timestamp: i64, name: &str, method: PaymentMethod, reference: Option<&str>) -> Sale {
        let rate = ExchangeRate::default();
        let total = Money::from_cents(250);
        Sale {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp,
            items: vec![SaleItem {
                product_id: "p".to_string(),
                name: name.to_string(),
                quantity: 1,
                price_usd: total,
                total_usd: total,
            }],
            total_usd: total,
            total_ves: rate.to_ves(total),
            exchange_rate: rate,
            payment_method: method,
            reference: reference.map(str::to_string),
        }
    }

    fn ledger() -> Vec<Sale> {
        vec![
            sale(noon(2024, 3, 3), "Chicha Clásica", PaymentMethod::PagoMovil, Some("REF-0412")),
            sale(noon(2024, 3, 2), "Papelón con Limón", PaymentMethod::CashUsd, None),
            sale(noon(2024, 3, 1), "Chicha Grande", PaymentMethod::Card, None),
        ]
    }

    #[test]
    fn test_default_filter_keeps_everything() {
        let sales = ledger();
        assert_eq!(SalesFilter::default().apply(&sales, &tz()).len(), 3);
    }

    #[test]
    fn test_search_names_and_reference() {
        let sales = ledger();
        let filter = SalesFilter {
            search: "CHICHA".to_string(),
            ..Default::default()
        };
        assert_eq!(filter.apply(&sales, &tz()).len(), 2);

        let filter = SalesFilter {
            search: "ref-04".to_string(),
            ..Default::default()
        };
        let found = filter.apply(&sales, &tz());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].payment_method, PaymentMethod::PagoMovil);
    }

    #[test]
    fn test_method_filter() {
        let sales = ledger();
        let filter = SalesFilter {
            method: Some(PaymentMethod::CashUsd),
            ..Default::default()
        };
        assert_eq!(filter.apply(&sales, &tz()).len(), 1);
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let sales = ledger();
        let d = |day| NaiveDate::from_ymd_opt(2024, 3, day);

        let filter = SalesFilter {
            start: d(2),
            end: d(2),
            ..Default::default()
        };
        assert_eq!(filter.apply(&sales, &tz()).len(), 1);

        let filter = SalesFilter {
            start: d(1),
            end: d(3),
            ..Default::default()
        };
        assert_eq!(filter.apply(&sales, &tz()).len(), 3);

        let filter = SalesFilter {
            start: d(4),
            ..Default::default()
        };
        assert!(filter.apply(&sales, &tz()).is_empty());
    }

    #[test]
    fn test_dimensions_combine_with_and() {
        let sales = ledger();
        let filter = SalesFilter {
            search: "chicha".to_string(),
            method: Some(PaymentMethod::Card),
            start: NaiveDate::from_ymd_opt(2024, 3, 1),
            end: None,
        };
        let found = filter.apply(&sales, &tz());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].items[0].name, "Chicha Grande");
    }

    #[test]
    fn test_stats() {
        let sales = ledger();
        let stats = HistoryStats::from_sales(&sales);
        assert_eq!(stats.count, 3);
        assert_eq!(stats.total_usd.cents(), 750);
        assert_eq!(stats.total_ves.cents(), 3 * 11375);

        assert_eq!(HistoryStats::from_sales(std::iter::empty()), HistoryStats::default());
    }
}
