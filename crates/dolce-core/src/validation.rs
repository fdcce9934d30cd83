//! # Validation Module
//!
//! Business-rule checks for everything an operator types in.
//!
//! ## Where Input Enters
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Operator Input                                     │
//! │                                                                         │
//! │  Product form ──► name, price, category, description                   │
//! │  Rate entry   ──► ExchangeRate::from_str (currency module)             │
//! │  Checkout     ──► Pago Móvil reference                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  THIS MODULE: reject, or hand back the cleaned value                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  State only changes after every check passed                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use dolce_core::validation::{validate_product_name, validate_price};
//! use dolce_core::money::Money;
//!
//! assert!(validate_product_name("Chicha Clásica").is_ok());
//! assert!(validate_price(Money::from_cents(250)).is_ok());
//! assert!(validate_price(Money::zero()).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::PaymentMethod;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_NAME_LEN: usize = 100;
const MAX_CATEGORY_LEN: usize = 50;
/// Longest description the product form accepts, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 500;
const MAX_REFERENCE_LEN: usize = 50;

/// Highest accepted product price ($1,000,000.00).
pub const MAX_PRICE: Money = Money::from_cents(100_000_000);

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name and returns it trimmed.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - At most 100 characters
pub fn validate_product_name(name: &str) -> ValidationResult<String> {
    required_text("name", name, MAX_NAME_LEN)
}

/// Validates a category and returns it trimmed.
pub fn validate_category(category: &str) -> ValidationResult<String> {
    required_text("category", category, MAX_CATEGORY_LEN)
}

/// Trims a description. Blank means "no description".
pub fn validate_description(description: Option<&str>) -> ValidationResult<Option<String>> {
    let Some(text) = description.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(None);
    };

    if text.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ValidationError::TooLong {
            field: "description".to_string(),
            max: MAX_DESCRIPTION_LEN,
        });
    }

    Ok(Some(text.to_string()))
}

/// Keeps a transfer reference only where the method takes one.
///
/// ## Rules
/// - Dropped for every method but Pago Móvil
/// - Trimmed; blank becomes `None`
/// - At most 50 characters
///
/// ## Example
/// ```rust
/// use dolce_core::types::PaymentMethod;
/// use dolce_core::validation::normalize_reference;
///
/// let kept = normalize_reference(PaymentMethod::PagoMovil, Some(" 1234 ")).unwrap();
/// assert_eq!(kept.as_deref(), Some("1234"));
///
/// let dropped = normalize_reference(PaymentMethod::Card, Some("1234")).unwrap();
/// assert_eq!(dropped, None);
/// ```
pub fn normalize_reference(
    method: PaymentMethod,
    reference: Option<&str>,
) -> ValidationResult<Option<String>> {
    if !method.takes_reference() {
        return Ok(None);
    }

    let Some(text) = reference.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(None);
    };

    if text.chars().count() > MAX_REFERENCE_LEN {
        return Err(ValidationError::TooLong {
            field: "reference".to_string(),
            max: MAX_REFERENCE_LEN,
        });
    }

    Ok(Some(text.to_string()))
}

/// Trims generated text and cuts it to [`MAX_DESCRIPTION_LEN`] characters
/// so it always passes [`validate_description`].
pub fn clip_description(text: &str) -> String {
    let clipped: String = text.trim().chars().take(MAX_DESCRIPTION_LEN).collect();
    clipped.trim_end().to_string()
}

fn required_text(field: &str, value: &str, max: usize) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(value.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a product price.
///
/// ## Rules
/// - Must be strictly positive: a free drink cannot be rung up
/// - At most [`MAX_PRICE`], so cart line totals stay far inside `i64`
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if !price.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }

    if price > MAX_PRICE {
        return Err(ValidationError::TooLarge {
            field: "price".to_string(),
            max: MAX_PRICE.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
