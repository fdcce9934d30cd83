//! # Currency Module
//!
//! The exchange rate, USD ⇄ VES conversion, and two-currency formatting.
//!
//! ## Conversion Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  to_ves(usd, rate) = usd × rate                                         │
//! │  to_usd(ves, rate) = rate > 0 ? ves ÷ rate : 0                          │
//! │                                                                         │
//! │  Both round half away from zero to the nearest minor unit.             │
//! │  Neither ever fails: a zero/negative rate converts to 0.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Where the Rate Flows
//! ```text
//! Operator types "46,20" ──► ExchangeRate::from_str ──► active rate
//!                                                         │
//!         ┌───────────────────────────────────────────────┼──────────────┐
//!         ▼                                               ▼              ▼
//!   Cart::total_ves (live)                 Cart::checkout (snapshot)  Calculator
//! ```
//! A rate change never rewrites a sale: each [`crate::types::Sale`] keeps the
//! rate that was active when it was created.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{de, ser};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::money::{DecimalVisitor, Money};
use crate::validation::ValidationResult;

/// Rate used when nothing valid has been persisted yet (Bs. per USD).
pub const DEFAULT_EXCHANGE_RATE: Decimal = Decimal::from_parts(4550, 0, 0, false, 2);

// =============================================================================
// Currency
// =============================================================================

/// The two currencies the stand prices in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// US dollar, the reference currency all prices are stored in.
    #[default]
    Usd,
    /// Venezuelan bolívar, the local currency.
    Ves,
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Currency::Usd => write!(f, "USD"),
            Currency::Ves => write!(f, "VES"),
        }
    }
}

impl FromStr for Currency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "usd" | "$" | "dollar" | "dollars" => Ok(Currency::Usd),
            "ves" | "bs" | "bs." | "bolivar" | "bolivares" => Ok(Currency::Ves),
            other => Err(ValidationError::InvalidFormat {
                field: "currency".to_string(),
                reason: format!("unknown currency '{}', expected USD or VES", other),
            }),
        }
    }
}

// =============================================================================
// Exchange Rate
// =============================================================================

/// Bolívares per US dollar. Always strictly positive.
///
/// Set only by an explicit operator action; never fetched.
///
/// ## Example
/// ```rust
/// use dolce_core::currency::ExchangeRate;
///
/// assert!("45.50".parse::<ExchangeRate>().is_ok());
/// assert!("abc".parse::<ExchangeRate>().is_err());
/// assert!("-5".parse::<ExchangeRate>().is_err());
/// assert!("0".parse::<ExchangeRate>().is_err());
/// ```
///
/// Sales store their rate as a plain JSON number (`45.5`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExchangeRate(Decimal);

impl ExchangeRate {
    /// Creates a rate, rejecting zero and negative values.
    pub fn new(value: Decimal) -> ValidationResult<Self> {
        if value <= Decimal::ZERO {
            return Err(ValidationError::MustBePositive {
                field: "exchange rate".to_string(),
            });
        }
        Ok(ExchangeRate(value.normalize()))
    }

    /// Returns the rate as an exact decimal.
    #[inline]
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Converts a USD amount to VES at this rate.
    #[inline]
    pub fn to_ves(&self, usd: Money) -> Money {
        to_ves(usd, self.0)
    }

    /// Converts a VES amount to USD at this rate.
    #[inline]
    pub fn to_usd(&self, ves: Money) -> Money {
        to_usd(ves, self.0)
    }
}

impl Default for ExchangeRate {
    fn default() -> Self {
        ExchangeRate(DEFAULT_EXCHANGE_RATE.normalize())
    }
}

impl TryFrom<Decimal> for ExchangeRate {
    type Error = ValidationError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        ExchangeRate::new(value)
    }
}

impl From<ExchangeRate> for Decimal {
    fn from(rate: ExchangeRate) -> Self {
        rate.0
    }
}

impl Serialize for ExchangeRate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let value = self.0.to_f64().ok_or_else(|| {
            <S::Error as ser::Error>::custom(format!("rate {} has no f64 form", self.0))
        })?;
        serializer.serialize_f64(value)
    }
}

impl<'de> Deserialize<'de> for ExchangeRate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = deserializer.deserialize_any(DecimalVisitor)?;
        ExchangeRate::new(value).map_err(de::Error::custom)
    }
}

/// Parses a manually typed rate. Accepts `,` as decimal separator.
impl FromStr for ExchangeRate {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Required {
                field: "exchange rate".to_string(),
            });
        }

        let value = Decimal::from_str(&trimmed.replace(',', ".")).map_err(|_| {
            ValidationError::InvalidFormat {
                field: "exchange rate".to_string(),
                reason: format!("'{}' is not a number", trimmed),
            }
        })?;

        ExchangeRate::new(value)
    }
}

/// Renders with at least two decimals (`45.50`, `36.1234`).
impl fmt::Display for ExchangeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.scale() < 2 {
            write!(f, "{:.2}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

// =============================================================================
// Conversion
// =============================================================================

/// `usd × rate`, rounded to the nearest céntimo.
pub fn to_ves(usd: Money, rate: Decimal) -> Money {
    match usd.to_decimal().checked_mul(rate) {
        Some(ves) => Money::from_decimal(ves),
        None => saturate(usd.is_negative() != rate.is_sign_negative()),
    }
}

/// `ves ÷ rate`, rounded to the nearest cent. Returns zero when the rate is
/// zero or negative instead of failing.
pub fn to_usd(ves: Money, rate: Decimal) -> Money {
    if rate <= Decimal::ZERO {
        return Money::zero();
    }
    match ves.to_decimal().checked_div(rate) {
        Some(usd) => Money::from_decimal(usd),
        None => saturate(ves.is_negative()),
    }
}

fn saturate(negative: bool) -> Money {
    if negative {
        Money::from_cents(i64::MIN)
    } else {
        Money::from_cents(i64::MAX)
    }
}

// =============================================================================
// Formatting
// =============================================================================

/// Formats an amount with the currency's symbol and digit grouping.
///
/// ## Example
/// ```rust
/// use dolce_core::currency::{format, Currency};
/// use dolce_core::money::Money;
///
/// assert_eq!(format(Money::from_cents(123450), Currency::Usd), "$1,234.50");
/// assert_eq!(format(Money::from_cents(123450), Currency::Ves), "Bs. 1.234,50");
/// ```
pub fn format(amount: Money, currency: Currency) -> String {
    let sign = if amount.is_negative() { "-" } else { "" };
    let major = amount.major().unsigned_abs();
    let minor = amount.minor();

    match currency {
        Currency::Usd => format!("{}${}.{:02}", sign, group_thousands(major, ','), minor),
        Currency::Ves => format!("{}Bs. {},{:02}", sign, group_thousands(major, '.'), minor),
    }
}

fn group_thousands(value: u64, separator: char) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}

// =============================================================================
// Calculator
// =============================================================================

/// Two linked input fields for the quick USD ⇄ VES calculator.
///
/// Editing one side recomputes the other at the active rate. Input that does
/// not parse counts as zero, so the counterpart shows `0.00` rather than an
/// error while the operator is mid-keystroke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calculator {
    usd: String,
    ves: String,
}

impl Calculator {
    /// Starts at `1` USD and its VES value.
    pub fn new(rate: ExchangeRate) -> Self {
        let mut calc = Calculator {
            usd: "1".to_string(),
            ves: String::new(),
        };
        calc.rate_changed(rate);
        calc
    }

    /// Returns the USD field as typed (or as computed).
    pub fn usd(&self) -> &str {
        &self.usd
    }

    /// Returns the VES field as typed (or as computed).
    pub fn ves(&self) -> &str {
        &self.ves
    }

    /// Operator edited the USD field.
    pub fn set_usd(&mut self, input: &str, rate: ExchangeRate) {
        self.usd = input.to_string();
        self.ves = rate.to_ves(parse_or_zero(input)).to_string();
    }

    /// Operator edited the VES field.
    pub fn set_ves(&mut self, input: &str, rate: ExchangeRate) {
        self.ves = input.to_string();
        self.usd = rate.to_usd(parse_or_zero(input)).to_string();
    }

    /// The active rate changed: the USD side is kept, VES follows.
    pub fn rate_changed(&mut self, rate: ExchangeRate) {
        self.ves = rate.to_ves(parse_or_zero(&self.usd)).to_string();
    }
}

fn parse_or_zero(input: &str) -> Money {
    input.parse().unwrap_or_default()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_to_ves() {
        assert_eq!(to_ves(Money::from_cents(250), dec!(45.50)).cents(), 11375);
        assert_eq!(to_ves(Money::from_cents(210), dec!(45.5)).cents(), 9555);
        assert_eq!(to_ves(Money::zero(), dec!(45.5)), Money::zero());
    }

    #[test]
    fn test_to_usd_guards_invalid_rate() {
        assert_eq!(to_usd(Money::from_cents(4550), dec!(45.50)).cents(), 100);
        assert_eq!(to_usd(Money::from_cents(4550), Decimal::ZERO), Money::zero());
        assert_eq!(to_usd(Money::from_cents(4550), dec!(-3)), Money::zero());
    }

    #[test]
    fn test_round_trip_one_dollar() {
        let one = Money::from_cents(100);
        for rate in [dec!(45.50), dec!(36.1234), dec!(1), dec!(0.75), dec!(512.9)] {
            assert_eq!(to_usd(to_ves(one, rate), rate), one, "rate {}", rate);
        }
    }

    #[test]
    fn test_rate_parsing() {
        assert_eq!("45.50".parse::<ExchangeRate>().unwrap().value(), dec!(45.5));
        assert_eq!(" 46,20 ".parse::<ExchangeRate>().unwrap().value(), dec!(46.2));

        assert!(matches!(
            "abc".parse::<ExchangeRate>(),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            "-5".parse::<ExchangeRate>(),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(matches!(
            "0".parse::<ExchangeRate>(),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(matches!(
            "".parse::<ExchangeRate>(),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_rate_display() {
        assert_eq!(ExchangeRate::default().to_string(), "45.50");
        assert_eq!("36.1234".parse::<ExchangeRate>().unwrap().to_string(), "36.1234");
        assert_eq!("40".parse::<ExchangeRate>().unwrap().to_string(), "40.00");
    }

    #[test]
    fn test_rate_serde_rejects_non_positive() {
        let json = serde_json::to_string(&ExchangeRate::default()).unwrap();
        assert_eq!(json, "45.5");
        let back: ExchangeRate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ExchangeRate::default());

        let precise: ExchangeRate = serde_json::from_str("36.1234").unwrap();
        assert_eq!(precise.value(), dec!(36.1234));
        let whole: ExchangeRate = serde_json::from_str("40").unwrap();
        assert_eq!(whole.value(), dec!(40));

        assert!(serde_json::from_str::<ExchangeRate>("-1").is_err());
        assert!(serde_json::from_str::<ExchangeRate>("0").is_err());
        assert!(serde_json::from_str::<ExchangeRate>("\"-1\"").is_err());
    }

    #[test]
    fn test_format() {
        assert_eq!(format(Money::from_cents(250), Currency::Usd), "$2.50");
        assert_eq!(format(Money::from_cents(123456789), Currency::Usd), "$1,234,567.89");
        assert_eq!(format(Money::from_cents(11375), Currency::Ves), "Bs. 113,75");
        assert_eq!(format(Money::from_cents(123450), Currency::Ves), "Bs. 1.234,50");
        assert_eq!(format(Money::from_cents(-550), Currency::Usd), "-$5.50");
        assert_eq!(format(Money::zero(), Currency::Ves), "Bs. 0,00");
    }

    #[test]
    fn test_currency_parsing() {
        assert_eq!("usd".parse::<Currency>().unwrap(), Currency::Usd);
        assert_eq!("Bs".parse::<Currency>().unwrap(), Currency::Ves);
        assert!("eur".parse::<Currency>().is_err());
    }

    #[test]
    fn test_calculator_follows_edits_and_rate() {
        let rate = ExchangeRate::default();
        let mut calc = Calculator::new(rate);
        assert_eq!(calc.usd(), "1");
        assert_eq!(calc.ves(), "45.50");

        calc.set_usd("2", rate);
        assert_eq!(calc.ves(), "91.00");

        calc.set_ves("455", rate);
        assert_eq!(calc.usd(), "10.00");

        calc.set_ves("garbage", rate);
        assert_eq!(calc.usd(), "0.00");

        calc.set_usd("1", rate);
        calc.rate_changed("50".parse().unwrap());
        assert_eq!(calc.ves(), "50.00");
    }
}
