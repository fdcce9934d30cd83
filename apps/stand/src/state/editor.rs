//! # Product Editor
//!
//! The open product form. Each opening gets a new ticket; an asynchronous
//! description result is accepted only while its ticket is still current.

use dolce_core::{Currency, Money, Product, ProductDraft};

/// Category preselected on a blank form.
pub const DEFAULT_CATEGORY: &str = "Chichas";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductEditor {
    pub ticket: u64,

    /// Product being edited; `None` when creating.
    pub target: Option<String>,

    pub draft: ProductDraft,

    /// A description request is in flight.
    pub generating: bool,
}

impl ProductEditor {
    /// Blank form for a new product.
    pub fn create(ticket: u64) -> Self {
        ProductEditor {
            ticket,
            target: None,
            draft: ProductDraft {
                name: String::new(),
                price: Money::zero(),
                price_currency: Currency::Usd,
                category: DEFAULT_CATEGORY.to_string(),
                description: None,
            },
            generating: false,
        }
    }

    /// Form prefilled from an existing product.
    pub fn edit(ticket: u64, product: &Product) -> Self {
        ProductEditor {
            ticket,
            target: Some(product.id.clone()),
            draft: ProductDraft::from_product(product),
            generating: false,
        }
    }

    pub fn is_new(&self) -> bool {
        self.target.is_none()
    }
}
