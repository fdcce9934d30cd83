//! # Catalog
//!
//! The in-memory product list and the product form that feeds it.
//!
//! ```text
//! ProductDraft ──validate──► Product ──► Catalog::add / Catalog::update
//!   (price in USD or VES)      (price in USD, id assigned)
//! ```
//!
//! The catalog never looks at the sales ledger: deleting a product leaves
//! every recorded [`crate::types::SaleItem`] exactly as it was.

use serde::{Deserialize, Serialize};

use crate::currency::{Currency, ExchangeRate};
use crate::error::ValidationError;
use crate::money::Money;
use crate::types::Product;
use crate::validation::{
    validate_category, validate_description, validate_price, validate_product_name,
    ValidationResult,
};

// =============================================================================
// Catalog
// =============================================================================

/// Ordered product list, unique by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Wraps an already loaded product list.
    pub fn from_products(products: Vec<Product>) -> Self {
        Catalog { products }
    }

    /// The stand's starting menu, used when nothing has been saved yet.
    pub fn with_defaults() -> Self {
        let item = |name: &str, cents: i64, category: &str| {
            Product::new(name, Money::from_cents(cents), category, None)
        };

        Catalog::from_products(vec![
            item("Chicha Clásica", 250, "Chichas"),
            item("Chicha con Arequipe", 300, "Chichas"),
            item("Chicha Grande", 350, "Chichas"),
            item("Papelón con Limón", 150, "Bebidas"),
            item("Jugo de Parchita", 200, "Bebidas"),
            item("Cocada", 250, "Bebidas"),
            item("Golfeado", 180, "Dulces"),
            item("Quesillo", 200, "Dulces"),
        ])
    }

    /// All products, in insertion order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Appends a product. Ids must be unique.
    pub fn add(&mut self, product: Product) -> ValidationResult<()> {
        if self.get(&product.id).is_some() {
            return Err(ValidationError::Duplicate {
                field: "product id".to_string(),
                value: product.id,
            });
        }
        self.products.push(product);
        Ok(())
    }

    /// Replaces the product with the same id. Returns whether one matched.
    pub fn update(&mut self, product: Product) -> bool {
        match self.products.iter_mut().find(|p| p.id == product.id) {
            Some(existing) => {
                *existing = product;
                true
            }
            None => false,
        }
    }

    /// Removes a product. Returns the removed product, if any.
    pub fn delete(&mut self, id: &str) -> Option<Product> {
        let index = self.products.iter().position(|p| p.id == id)?;
        Some(self.products.remove(index))
    }

    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Products in a category; `None` means every product (the "All" tab).
    pub fn by_category<'a>(&'a self, category: Option<&'a str>) -> impl Iterator<Item = &'a Product> {
        self.products
            .iter()
            .filter(move |p| category.map_or(true, |c| p.category == c))
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for product in &self.products {
            if !seen.contains(&product.category.as_str()) {
                seen.push(&product.category);
            }
        }
        seen
    }

    /// Case-insensitive lookup by exact name, for operators who type names.
    pub fn find_by_name(&self, name: &str) -> Option<&Product> {
        let needle = name.trim().to_lowercase();
        self.products.iter().find(|p| p.name.to_lowercase() == needle)
    }
}

// =============================================================================
// Product Form
// =============================================================================

/// What the operator fills in on the product form.
///
/// The price may be typed in either currency; VES is converted to USD at
/// the active rate on submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    pub price: Money,
    pub price_currency: Currency,
    pub category: String,
    pub description: Option<String>,
}

impl ProductDraft {
    /// Prefills the form for editing an existing product (price in USD).
    pub fn from_product(product: &Product) -> Self {
        ProductDraft {
            name: product.name.clone(),
            price: product.price_usd,
            price_currency: Currency::Usd,
            category: product.category.clone(),
            description: product.description.clone(),
        }
    }

    /// Validates the form into a new product with a fresh id.
    ///
    /// ## Errors
    /// - Empty name or category
    /// - A price that is not positive, or above
    ///   [`MAX_PRICE`](crate::validation::MAX_PRICE), once expressed in USD
    pub fn build(&self, rate: ExchangeRate) -> ValidationResult<Product> {
        let mut product = Product::new(String::new(), Money::zero(), String::new(), None);
        self.fill(&mut product, rate)?;
        Ok(product)
    }

    /// Validates the form as an edit of `existing`; the id is kept.
    pub fn apply_to(&self, existing: &Product, rate: ExchangeRate) -> ValidationResult<Product> {
        let mut product = existing.clone();
        self.fill(&mut product, rate)?;
        Ok(product)
    }

    /// The entered price expressed in USD.
    pub fn price_usd(&self, rate: ExchangeRate) -> Money {
        match self.price_currency {
            Currency::Usd => self.price,
            Currency::Ves => rate.to_usd(self.price),
        }
    }

    fn fill(&self, product: &mut Product, rate: ExchangeRate) -> ValidationResult<()> {
        let name = validate_product_name(&self.name)?;
        let price_usd = self.price_usd(rate);
        validate_price(price_usd)?;
        let category = validate_category(&self.category)?;
        let description = validate_description(self.description.as_deref())?;

        product.name = name;
        product.price_usd = price_usd;
        product.category = category;
        product.description = description;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str, cents: i64, currency: Currency) -> ProductDraft {
        ProductDraft {
            name: name.to_string(),
            price: Money::from_cents(cents),
            price_currency: currency,
            category: "Chichas".to_string(),
            description: None,
        }
    }

    fn rate() -> ExchangeRate {
        "45.50".parse().unwrap()
    }

    #[test]
    fn test_default_catalog() {
        let catalog = Catalog::with_defaults();
        assert!(!catalog.is_empty());
        assert!(catalog.products().iter().all(|p| p.is_sellable()));
        assert_eq!(catalog.categories(), vec!["Chichas", "Bebidas", "Dulces"]);
    }

    #[test]
    fn test_add_get_delete() {
        let mut catalog = Catalog::default();
        let product = draft("Chicha", 250, Currency::Usd).build(rate()).unwrap();
        let id = product.id.clone();

        catalog.add(product.clone()).unwrap();
        assert_eq!(catalog.get(&id), Some(&product));
        assert!(matches!(
            catalog.add(product),
            Err(ValidationError::Duplicate { .. })
        ));

        assert!(catalog.delete(&id).is_some());
        assert!(catalog.get(&id).is_none());
        assert!(catalog.delete(&id).is_none());
    }

    #[test]
    fn test_update_matches_by_id() {
        let mut catalog = Catalog::with_defaults();
        let original = catalog.products()[0].clone();

        let edited = draft("Chicha Especial", 400, Currency::Usd)
            .apply_to(&original, rate())
            .unwrap();
        assert_eq!(edited.id, original.id);
        assert!(catalog.update(edited));
        assert_eq!(catalog.get(&original.id).unwrap().name, "Chicha Especial");
        assert_eq!(catalog.len(), Catalog::with_defaults().len());

        let stranger = draft("Ghost", 100, Currency::Usd).build(rate()).unwrap();
        assert!(!catalog.update(stranger));
    }

    #[test]
    fn test_by_category() {
        let catalog = Catalog::with_defaults();
        assert_eq!(catalog.by_category(None).count(), catalog.len());
        assert!(catalog
            .by_category(Some("Dulces"))
            .all(|p| p.category == "Dulces"));
        assert_eq!(catalog.by_category(Some("Nada")).count(), 0);
    }

    #[test]
    fn test_draft_price_in_ves_is_converted() {
        let product = draft("Chicha", 11375, Currency::Ves).build(rate()).unwrap();
        assert_eq!(product.price_usd.cents(), 250);
    }

    #[test]
    fn test_draft_rejects_bad_input() {
        assert!(matches!(
            draft("  ", 250, Currency::Usd).build(rate()),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            draft("Chicha", 0, Currency::Usd).build(rate()),
            Err(ValidationError::MustBePositive { .. })
        ));
        // Bs. 0.01 rounds to $0.00 at 45.50.
        assert!(draft("Chicha", 1, Currency::Ves).build(rate()).is_err());
    }

    #[test]
    fn test_draft_rejects_runaway_price() {
        let mut form = draft("Chicha", 0, Currency::Usd);
        form.price = "100000000000000000".parse().unwrap();
        assert!(matches!(
            form.build(rate()),
            Err(ValidationError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_find_by_name() {
        let catalog = Catalog::with_defaults();
        assert!(catalog.find_by_name("chicha clásica").is_some());
        assert!(catalog.find_by_name("Chicha").is_none());
    }
}
