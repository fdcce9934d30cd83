//! # Settings Repository
//!
//! The exchange rate and the logo. Both are stored as plain text, not JSON.

use std::sync::Arc;
use tracing::{debug, warn};

use dolce_core::ExchangeRate;

use super::{load_raw, EXCHANGE_RATE_KEY, LOGO_KEY};
use crate::error::DbResult;
use crate::store::KeyValueStore;

/// Logo shown until the operator sets one.
pub const DEFAULT_LOGO_URL: &str = "https://cdn-icons-png.flaticon.com/512/3130/3130432.png";

/// Repository for stand settings.
#[derive(Clone)]
pub struct SettingsRepository {
    store: Arc<dyn KeyValueStore>,
}

impl SettingsRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        SettingsRepository { store }
    }

    /// The saved rate, or `fallback` if none is stored or it is invalid.
    pub async fn load_rate(&self, fallback: ExchangeRate) -> ExchangeRate {
        let Some(raw) = load_raw(self.store.as_ref(), EXCHANGE_RATE_KEY).await else {
            return fallback;
        };

        match raw.parse::<ExchangeRate>() {
            Ok(rate) => {
                debug!(rate = %rate, "Exchange rate loaded");
                rate
            }
            Err(e) => {
                warn!(stored = %raw, error = %e, "Stored exchange rate is invalid, using default");
                fallback
            }
        }
    }

    pub async fn save_rate(&self, rate: ExchangeRate) -> DbResult<()> {
        self.store.save(EXCHANGE_RATE_KEY, &rate.to_string()).await
    }

    /// The saved logo (URL or data URI), or [`DEFAULT_LOGO_URL`].
    pub async fn load_logo(&self) -> String {
        match load_raw(self.store.as_ref(), LOGO_KEY).await {
            Some(logo) if !logo.trim().is_empty() => logo,
            _ => DEFAULT_LOGO_URL.to_string(),
        }
    }

    pub async fn save_logo(&self, logo: &str) -> DbResult<()> {
        self.store.save(LOGO_KEY, logo).await
    }
}
