//! # Commands Module
//!
//! Controller operations, grouped by concern.
//!
//! ```text
//! commands/
//! ├── product.rs  ◄─── Product form, catalog edits, descriptions
//! ├── cart.rs     ◄─── Cart rows and checkout
//! ├── sale.rs     ◄─── History, sale deletion, daily close
//! └── config.rs   ◄─── Exchange rate, logo, calculator
//! ```
//!
//! Each file adds an `impl Controller` block; every mutating command
//! persists the document it touched before returning.

mod cart;
mod config;
mod product;
mod sale;

pub use sale::HistoryPage;
