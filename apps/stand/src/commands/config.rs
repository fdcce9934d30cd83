//! # Settings Commands
//!
//! Exchange rate, logo and the USD ⇄ VES calculator.

use tracing::{debug, info};

use dolce_core::currency::Calculator;
use dolce_core::{ExchangeRate, ValidationError};

use crate::controller::Controller;
use crate::error::ApiResult;

impl Controller {
    /// Sets the active rate from operator input.
    ///
    /// Invalid input (empty, not a number, zero or negative) is rejected and
    /// the previous rate stays active.
    pub async fn set_rate(&mut self, input: &str) -> ApiResult<ExchangeRate> {
        debug!(input = %input, "set_rate command");

        let rate: ExchangeRate = input.parse()?;
        self.state.rate = rate;
        self.state.calculator.rate_changed(rate);
        self.persist_rate().await;

        info!(rate = %rate, "Exchange rate updated");
        Ok(rate)
    }

    /// Replaces the logo (URL or data URI).
    pub async fn set_logo(&mut self, logo: &str) -> ApiResult<()> {
        debug!("set_logo command");

        let logo = logo.trim();
        if logo.is_empty() {
            return Err(ValidationError::Required { field: "logo".into() }.into());
        }

        self.state.logo = logo.to_string();
        self.persist_logo().await;
        Ok(())
    }

    /// Operator typed into the calculator's USD field.
    pub fn convert_usd(&mut self, input: &str) -> &Calculator {
        let rate = self.state.rate;
        self.state.calculator.set_usd(input, rate);
        &self.state.calculator
    }

    /// Operator typed into the calculator's VES field.
    pub fn convert_ves(&mut self, input: &str) -> &Calculator {
        let rate = self.state.rate;
        self.state.calculator.set_ves(input, rate);
        &self.state.calculator
    }
}
