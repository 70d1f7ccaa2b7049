//! # Catalog
//!
//! The farm's products as shown on the product cards.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CatalogEntry (JSON, price "$4.99")                                     │
//! │        │  validate id/name, parse price label                           │
//! │        ▼                                                                │
//! │  Product (price = Money) ──► Product::cart_item() ──► AddItem payload   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::CartItem;
use crate::validation::{validate_price_label, validate_product_id, validate_required, ValidationResult};

// =============================================================================
// Product
// =============================================================================

/// A product card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: Money,
    pub unit: String,
    pub image: String,
    pub features: Vec<String>,
    /// Shows the "Most Popular" ribbon.
    pub popular: bool,
}

impl Product {
    /// The subset of product data the cart keeps.
    pub fn cart_item(&self) -> CartItem {
        CartItem {
            id: self.id.clone(),
            name: self.name.clone(),
            price: self.price,
            image: self.image.clone(),
            unit: self.unit.clone(),
        }
    }
}

/// A product as written in a catalog file, price still a display label.
///
/// ```json
/// { "id": "fresh-milk", "name": "Fresh Whole Milk", "price": "$4.99",
///   "unit": "per gallon", "image": "/milk.png" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: String,
    pub unit: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub popular: bool,
}

impl TryFrom<CatalogEntry> for Product {
    type Error = ValidationError;

    fn try_from(entry: CatalogEntry) -> ValidationResult<Self> {
        validate_product_id(&entry.id)?;
        validate_required("name", &entry.name)?;
        let price = validate_price_label(&entry.price)?;

        Ok(Product {
            id: entry.id,
            name: entry.name,
            description: entry.description,
            price,
            unit: entry.unit,
            image: entry.image,
            features: entry.features,
            popular: entry.popular,
        })
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// Ordered product list with unique ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Builds a catalog from file entries, validating each one.
    ///
    /// ## Errors
    /// - The first invalid entry's `ValidationError`
    /// - `Duplicate` when two entries share an id
    pub fn from_entries(entries: impl IntoIterator<Item = CatalogEntry>) -> CoreResult<Self> {
        let mut products: Vec<Product> = Vec::new();
        for entry in entries {
            let product = Product::try_from(entry)?;
            if products.iter().any(|p| p.id == product.id) {
                return Err(ValidationError::Duplicate {
                    field: "id".to_string(),
                    value: product.id,
                }
                .into());
            }
            products.push(product);
        }
        Ok(Catalog { products })
    }

    /// The farm's shop: milk, butter, cheese, yogurt, cream and ice cream.
    pub fn dairy() -> Self {
        let product = |id: &str,
                       name: &str,
                       description: &str,
                       cents: i64,
                       unit: &str,
                       image: &str,
                       features: [&str; 4],
                       popular: bool| Product {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            price: Money::from_cents(cents),
            unit: unit.to_string(),
            image: image.to_string(),
            features: features.iter().map(|f| f.to_string()).collect(),
            popular,
        };

        Catalog {
            products: vec![
                product(
                    "fresh-milk",
                    "Fresh Whole Milk",
                    "Rich, creamy milk from our grass-fed cows. Perfect for drinking, cooking, and baking.",
                    499,
                    "per gallon",
                    "/milk.png",
                    ["Grass-fed cows", "No hormones", "Pasteurized", "Glass bottles available"],
                    true,
                ),
                product(
                    "artisan-butter",
                    "Artisan Butter",
                    "Churned fresh daily from the cream of our finest milk. Rich, creamy, and delicious.",
                    699,
                    "per pound",
                    "/butter.png",
                    ["Churned daily", "Salted & unsalted", "Premium cream", "Traditional methods"],
                    false,
                ),
                product(
                    "farmhouse-cheese",
                    "Farmhouse Cheese",
                    "Aged to perfection in our cheese caves. From mild cheddar to sharp aged varieties.",
                    1299,
                    "per pound",
                    "/cheese.png",
                    ["Cave aged", "Multiple varieties", "Award winning", "Small batch"],
                    false,
                ),
                product(
                    "greek-yogurt",
                    "Greek Yogurt",
                    "Thick, creamy yogurt packed with probiotics and made from our fresh milk.",
                    599,
                    "per container",
                    "/yogurt.png",
                    ["Probiotic rich", "Multiple flavors", "Low sugar", "High protein"],
                    false,
                ),
                product(
                    "heavy-cream",
                    "Heavy Cream",
                    "Rich, thick cream perfect for cooking, baking, and making your own butter.",
                    399,
                    "per pint",
                    "/hc.png",
                    ["Ultra-rich", "Whips perfectly", "Cooking grade", "Fresh daily"],
                    false,
                ),
                product(
                    "ice-cream",
                    "Ice Cream",
                    "Handcrafted ice cream made with our fresh cream and natural ingredients.",
                    899,
                    "per quart",
                    "/hc.png",
                    ["Handcrafted", "Natural ingredients", "Seasonal flavors", "Family recipe"],
                    false,
                ),
            ],
        }
    }

    /// Looks up a product by id.
    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Like [`Catalog::get`], but an unknown id is an error.
    pub fn require(&self, id: &str) -> CoreResult<&Product> {
        self.get(id)
            .ok_or_else(|| CoreError::ProductNotFound(id.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog::dairy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, price: &str) -> CatalogEntry {
        CatalogEntry {
            id: id.to_string(),
            name: format!("Product {}", id),
            description: String::new(),
            price: price.to_string(),
            unit: "each".to_string(),
            image: String::new(),
            features: Vec::new(),
            popular: false,
        }
    }

    #[test]
    fn test_dairy_catalog() {
        let catalog = Catalog::dairy();
        assert_eq!(catalog.len(), 6);

        let milk = catalog.get("fresh-milk").unwrap();
        assert_eq!(milk.price, Money::parse_label("$4.99").unwrap());
        assert_eq!(milk.unit, "per gallon");
        assert!(milk.popular);
        assert_eq!(catalog.iter().filter(|p| p.popular).count(), 1);

        assert_eq!(catalog.get("farmhouse-cheese").unwrap().price.cents(), 1299);
        assert!(catalog.get("goat-milk").is_none());
    }

    #[test]
    fn test_dairy_ids_are_valid_and_unique() {
        let catalog = Catalog::dairy();
        for product in catalog.iter() {
            validate_product_id(&product.id).unwrap();
            assert_eq!(catalog.iter().filter(|p| p.id == product.id).count(), 1);
        }
    }

    #[test]
    fn test_cart_item_carries_card_fields() {
        let catalog = Catalog::dairy();
        let item = catalog.get("heavy-cream").unwrap().cart_item();
        assert_eq!(item.id, "heavy-cream");
        assert_eq!(item.price.cents(), 399);
        assert_eq!(item.unit, "per pint");
        assert_eq!(item.image, "/hc.png");
    }

    #[test]
    fn test_from_entries_parses_labels() {
        let catalog = Catalog::from_entries(vec![entry("kefir", "$3.49"), entry("ghee", "11")]).unwrap();
        assert_eq!(catalog.get("kefir").unwrap().price.cents(), 349);
        assert_eq!(catalog.get("ghee").unwrap().price.cents(), 1100);
        assert_eq!(catalog.iter().next().unwrap().id, "kefir");
    }

    #[test]
    fn test_from_entries_rejects_bad_input() {
        let dup = Catalog::from_entries(vec![entry("kefir", "$3.49"), entry("kefir", "$1")]);
        assert!(matches!(
            dup,
            Err(CoreError::Validation(ValidationError::Duplicate { .. }))
        ));

        let bad_price = Catalog::from_entries(vec![entry("kefir", "$15 per person")]);
        assert!(matches!(bad_price, Err(CoreError::Validation(_))));

        let no_name = Catalog::from_entries(vec![CatalogEntry {
            name: " ".to_string(),
            ..entry("kefir", "$1")
        }]);
        assert!(no_name.is_err());
    }

    #[test]
    fn test_entry_json_defaults() {
        let json = r#"[{"id":"kefir","name":"Kefir","price":"$3.49","unit":"per bottle"}]"#;
        let entries: Vec<CatalogEntry> = serde_json::from_str(json).unwrap();
        let catalog = Catalog::from_entries(entries).unwrap();
        let kefir = catalog.require("kefir").unwrap();
        assert!(kefir.features.is_empty());
        assert!(!kefir.popular);
        assert!(matches!(
            catalog.require("nope"),
            Err(CoreError::ProductNotFound(id)) if id == "nope"
        ));
    }
}
