//! # Views
//!
//! The five screens of the stand.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which screen is showing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum View {
    /// Product grid and cart.
    #[default]
    Pos,
    /// Catalog management and the product form.
    Inventory,
    /// Sales history with filters.
    Sales,
    /// USD ⇄ VES calculator.
    Calculator,
    /// End-of-day summary.
    DailyClose,
}

impl View {
    pub const ALL: [View; 5] = [
        View::Pos,
        View::Inventory,
        View::Sales,
        View::Calculator,
        View::DailyClose,
    ];

    /// Title shown in the navigation bar.
    pub const fn title(&self) -> &'static str {
        match self {
            View::Pos => "Vender",
            View::Inventory => "Inventario",
            View::Sales => "Historial",
            View::Calculator => "Calculadora",
            View::DailyClose => "Cierre del Día",
        }
    }

    /// Only the inventory screen hosts the product form.
    pub const fn hosts_editor(&self) -> bool {
        match self {
            View::Inventory => true,
            View::Pos | View::Sales | View::Calculator | View::DailyClose => false,
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_inventory_hosts_editor() {
        let hosts: Vec<View> = View::ALL.into_iter().filter(View::hosts_editor).collect();
        assert_eq!(hosts, vec![View::Inventory]);
    }

    #[test]
    fn test_titles_are_distinct() {
        let mut titles: Vec<&str> = View::ALL.iter().map(View::title).collect();
        titles.sort_unstable();
        titles.dedup();
        assert_eq!(titles.len(), View::ALL.len());
    }
}
