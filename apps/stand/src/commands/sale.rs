//! # Sale Commands
//!
//! Sales history, deletion and the daily close.

use chrono::{NaiveDate, TimeZone};
use tracing::{debug, info};

use dolce_core::history::{HistoryStats, SalesFilter};
use dolce_core::report::{daily_close, DailySummary};
use dolce_core::{CoreError, Sale};

use crate::controller::Controller;
use crate::error::ApiResult;

/// Filtered sales with their totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryPage<'a> {
    pub sales: Vec<&'a Sale>,
    pub stats: HistoryStats,
}

impl Controller {
    /// Sales matching `filter`, newest first, with their totals.
    ///
    /// Any search text is accepted; it is trimmed and matched as a substring.
    pub fn history<Tz: TimeZone>(&self, filter: &SalesFilter, tz: &Tz) -> HistoryPage<'_> {
        debug!(search = %filter.search.trim(), method = ?filter.method, start = ?filter.start, end = ?filter.end, "history command");

        let sales = filter.apply(&self.state.sales, tz);
        let stats = HistoryStats::from_sales(sales.iter().copied());

        HistoryPage { sales, stats }
    }

    /// Removes a sale from the ledger.
    pub async fn delete_sale(&mut self, sale_id: &str) -> ApiResult<Sale> {
        debug!(sale_id = %sale_id, "delete_sale command");

        let position = self
            .state
            .sales
            .iter()
            .position(|s| s.id == sale_id)
            .ok_or_else(|| CoreError::SaleNotFound(sale_id.to_string()))?;

        let removed = self.state.sales.remove(position);
        self.persist_sales().await;

        info!(sale_id = %removed.id, total_usd = %removed.total_usd, "Sale deleted");
        Ok(removed)
    }

    /// End-of-day summary for `date` in `tz`.
    pub fn daily_close<Tz: TimeZone>(&self, date: NaiveDate, tz: &Tz) -> DailySummary {
        debug!(date = %date, "daily_close command");
        daily_close(&self.state.sales, date, tz)
    }
}
