//! # dolce-core: Pure Business Logic for the Dolce Stand POS
//!
//! This crate is the **heart** of the stand. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Dolce Stand Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    dolce-stand (Controller + CLI)               │   │
//! │  │    POS ──► Inventory ──► Daily Close ──► History ──► Calculator │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ dolce-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────────────┐  │   │
//! │  │   │  money   │ │ currency │ │   cart   │ │ report / history │  │   │
//! │  │   │  Money   │ │ ExchRate │ │   Cart   │ │  DailySummary    │  │   │
//! │  │   │          │ │ to_ves   │ │ checkout │ │  SalesFilter     │  │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO NETWORK • NO CLOCK                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    dolce-db (Persistence Adapter)               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, SaleItem, PaymentMethod)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`currency`] - Exchange rate, USD/VES conversion and formatting
//! - [`cart`] - Cart / sale builder
//! - [`catalog`] - In-memory product catalog and the product form
//! - [`report`] - Daily close aggregation
//! - [`history`] - Sales history filtering
//! - [`validation`] - Business rule validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use dolce_core::currency::ExchangeRate;
//! use dolce_core::money::Money;
//!
//! let rate: ExchangeRate = "45.50".parse().unwrap();
//! let price = Money::from_cents(250); // $2.50
//!
//! // $2.50 × 45.50 = Bs. 113.75
//! assert_eq!(rate.to_ves(price).cents(), 11375);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod currency;
pub mod error;
pub mod history;
pub mod money;
pub mod report;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::Cart;
pub use catalog::{Catalog, ProductDraft};
pub use currency::{Currency, ExchangeRate};
pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct products allowed in a single cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single product in the cart.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., tapping 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;
