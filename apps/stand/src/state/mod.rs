//! # State Module
//!
//! Everything the stand keeps in memory while it runs.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Controller (single owner)                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                              │                                          │
//! │                              ▼                                          │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                        AppState                                 │   │
//! │  │                                                                 │   │
//! │  │  Persisted               Session only                           │   │
//! │  │  ─────────               ────────────                           │   │
//! │  │  catalog                 cart                                   │   │
//! │  │  sales (newest first)    view / category tab                    │   │
//! │  │  rate                    calculator fields                      │   │
//! │  │  logo                    product editor (+ ticket)              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No locks: one controller owns the state and commands take `&mut self`.

mod editor;
mod view;

pub use editor::{ProductEditor, DEFAULT_CATEGORY};
pub use view::View;

use dolce_core::currency::Calculator;
use dolce_core::{Cart, Catalog, ExchangeRate, Sale};

/// Application state owned by the controller.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Products on sale.
    pub catalog: Catalog,

    /// Completed sales, newest first.
    pub sales: Vec<Sale>,

    /// Active VES per USD rate.
    pub rate: ExchangeRate,

    /// Logo URL or data URI.
    pub logo: String,

    /// Current order.
    pub cart: Cart,

    pub view: View,

    /// POS category tab; `None` shows every product.
    pub category: Option<String>,

    pub calculator: Calculator,

    /// Open product form, if any.
    pub editor: Option<ProductEditor>,

    next_ticket: u64,
}

impl AppState {
    /// Fresh session state around the persisted documents.
    pub fn new(catalog: Catalog, sales: Vec<Sale>, rate: ExchangeRate, logo: String) -> Self {
        AppState {
            catalog,
            sales,
            rate,
            logo,
            cart: Cart::new(),
            view: View::default(),
            category: None,
            calculator: Calculator::new(rate),
            editor: None,
            next_ticket: 1,
        }
    }

    /// Hands out the ticket for the next editor session.
    pub(crate) fn issue_ticket(&mut self) -> u64 {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        ticket
    }

    /// Active ticket, if an editor is open.
    pub fn editor_ticket(&self) -> Option<u64> {
        self.editor.as_ref().map(|e| e.ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = AppState::new(
            Catalog::with_defaults(),
            Vec::new(),
            ExchangeRate::default(),
            "logo.png".into(),
        );
        assert_eq!(state.view, View::Pos);
        assert!(state.cart.is_empty());
        assert!(state.editor.is_none());
        assert_eq!(state.calculator.usd(), "1");
        assert_eq!(state.calculator.ves(), "45.50");
    }

    #[test]
    fn test_tickets_increase() {
        let mut state = AppState::new(Catalog::default(), Vec::new(), ExchangeRate::default(), String::new());
        let first = state.issue_ticket();
        let second = state.issue_ticket();
        assert!(second > first);
        assert_eq!(state.editor_ticket(), None);
    }
}
