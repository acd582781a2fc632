/// Shared data structures for the storefront state
///
/// These structs represent the data model that flows between
/// the catalog sources, the state engine and the UI layer.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable product identifier assigned by the catalog API
pub type ItemId = u64;

/// Brand label used when a product has no brand
pub const UNKNOWN_BRAND: &str = "Unknown";

/// Stock level at or below which the card warns about low stock
const LOW_STOCK_THRESHOLD: u32 = 10;

/// Represents a single product in the catalog
///
/// Created by a catalog source and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    /// Unique, stable API id
    pub id: ItemId,
    pub title: String,
    pub description: String,
    /// Current price (non-negative)
    pub price: f64,
    /// Discount in percent (0-100)
    #[serde(default)]
    pub discount_percentage: f64,
    /// Average rating (0.0-5.0)
    #[serde(default)]
    pub rating: f64,
    /// Units in stock
    #[serde(default)]
    pub stock: u32,
    /// Some products have no brand; see [`CatalogItem::brand_or_unknown`]
    #[serde(default)]
    pub brand: Option<String>,
    pub category: String,
    /// URL of the small card image
    #[serde(default)]
    pub thumbnail: String,
    /// URLs of the detail carousel images, in display order
    #[serde(default)]
    pub images: Vec<String>,
}

impl CatalogItem {
    /// Brand used for grouping and filtering ("Unknown" when absent or empty)
    pub fn brand_or_unknown(&self) -> &str {
        match self.brand.as_deref() {
            Some(brand) if !brand.is_empty() => brand,
            _ => UNKNOWN_BRAND,
        }
    }

    /// Price after applying the discount, rounded to cents
    pub fn discounted_price(&self) -> f64 {
        let discount = self.discount_percentage.clamp(0.0, 100.0);
        let price = self.price * (1.0 - discount / 100.0);
        (price * 100.0).round() / 100.0
    }

    pub fn has_discount(&self) -> bool {
        self.discount_percentage > 0.0
    }

    pub fn is_in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Short stock status shown on cards and the detail page
    pub fn stock_label(&self) -> String {
        match self.stock {
            0 => "Out of Stock".to_string(),
            n if n <= LOW_STOCK_THRESHOLD => format!("Only {} left", n),
            _ => "In Stock".to_string(),
        }
    }
}

/// Ordering applied to the filtered result set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortMode {
    /// Keep catalog (insertion) order
    #[default]
    Default,
    PriceAsc,
    PriceDesc,
    NameAsc,
    NameDesc,
    RatingDesc,
}

impl SortMode {
    /// Every mode, in the order the sort picker lists them
    pub const ALL: [SortMode; 6] = [
        SortMode::Default,
        SortMode::PriceAsc,
        SortMode::PriceDesc,
        SortMode::NameAsc,
        SortMode::NameDesc,
        SortMode::RatingDesc,
    ];

    /// Stable key (`price-asc`, `name-desc`, ...)
    pub fn key(&self) -> &'static str {
        match self {
            SortMode::Default => "default",
            SortMode::PriceAsc => "price-asc",
            SortMode::PriceDesc => "price-desc",
            SortMode::NameAsc => "name-asc",
            SortMode::NameDesc => "name-desc",
            SortMode::RatingDesc => "rating-desc",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SortMode::Default => "Default",
            SortMode::PriceAsc => "Price: Low to High",
            SortMode::PriceDesc => "Price: High to Low",
            SortMode::NameAsc => "Name: A to Z",
            SortMode::NameDesc => "Name: Z to A",
            SortMode::RatingDesc => "Rating: High to Low",
        };
        f.write_str(label)
    }
}

/// The active search / filter / sort selections
///
/// `None` for category or brand means "all".
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterCriteria {
    /// Committed (debounced) search term, as typed
    pub search: String,
    pub category: Option<String>,
    pub brand: Option<String>,
    /// Maximum price; `<= 0` means no ceiling
    pub price_ceiling: f64,
    pub sort_mode: SortMode,
}

/// Filter options derived from the full catalog
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Facets {
    /// Distinct categories, sorted ascending
    pub categories: Vec<String>,
    /// Distinct brands ("Unknown" for missing), sorted ascending
    pub brands: Vec<String>,
    /// Highest price in the catalog, 0 when empty
    pub max_price: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> CatalogItem {
        CatalogItem {
            id: 1,
            title: "Essence Mascara".to_string(),
            description: "Lash princess".to_string(),
            price: 9.99,
            discount_percentage: 7.17,
            rating: 4.94,
            stock: 5,
            brand: None,
            category: "beauty".to_string(),
            thumbnail: String::new(),
            images: vec![],
        }
    }

    #[test]
    fn test_brand_falls_back_to_unknown() {
        let mut product = item();
        assert_eq!(product.brand_or_unknown(), "Unknown");

        product.brand = Some(String::new());
        assert_eq!(product.brand_or_unknown(), "Unknown");

        product.brand = Some("Essence".to_string());
        assert_eq!(product.brand_or_unknown(), "Essence");
    }

    #[test]
    fn test_discounted_price() {
        let product = item();
        assert_eq!(product.discounted_price(), 9.27);

        let full = CatalogItem { discount_percentage: 0.0, ..item() };
        assert_eq!(full.discounted_price(), 9.99);
        assert!(!full.has_discount());
    }

    #[test]
    fn test_stock_label() {
        let mut product = item();
        assert_eq!(product.stock_label(), "Only 5 left");

        product.stock = 0;
        assert_eq!(product.stock_label(), "Out of Stock");
        assert!(!product.is_in_stock());

        product.stock = 99;
        assert_eq!(product.stock_label(), "In Stock");
    }

    #[test]
    fn test_parse_api_product_without_brand() {
        let json = r#"{
            "id": 16,
            "title": "Apple",
            "description": "Fresh and crisp apples",
            "price": 1.99,
            "discountPercentage": 12.62,
            "rating": 2.96,
            "stock": 8,
            "category": "groceries",
            "thumbnail": "https://cdn.example.com/apple/thumbnail.webp",
            "images": ["https://cdn.example.com/apple/1.webp"],
            "tags": ["fruits"]
        }"#;

        let product: CatalogItem = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, 16);
        assert_eq!(product.brand, None);
        assert_eq!(product.discount_percentage, 12.62);
        assert_eq!(product.images.len(), 1);
    }

    #[test]
    fn test_sort_mode_labels() {
        assert_eq!(SortMode::default(), SortMode::Default);
        assert_eq!(SortMode::PriceAsc.key(), "price-asc");
        assert_eq!(SortMode::RatingDesc.key(), "rating-desc");
        assert_eq!(SortMode::NameDesc.to_string(), "Name: Z to A");
    }
}
