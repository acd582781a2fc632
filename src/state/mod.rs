/// State management module
///
/// This module owns everything the storefront knows at runtime:
/// - Shared data structures (data.rs)
/// - Filter options derived from the catalog (facets.rs)
/// - Filtering and sorting (query.rs)
/// - Progressive reveal of results (window.rs)
/// - Search input coalescing (debounce.rs)
/// - The catalog state engine tying these together (engine.rs)
/// - The product detail page (detail.rs)

pub mod data;
pub mod debounce;
pub mod detail;
pub mod engine;
pub mod facets;
pub mod query;
pub mod window;

#[cfg(test)]
pub(crate) mod testing {
    use super::data::{CatalogItem, ItemId};

    /// Minimal product for tests
    pub fn product(
        id: ItemId,
        title: &str,
        price: f64,
        category: &str,
        brand: Option<&str>,
    ) -> CatalogItem {
        CatalogItem {
            id,
            title: title.to_string(),
            description: format!("{title} description"),
            price,
            discount_percentage: 0.0,
            rating: 4.0,
            stock: 25,
            brand: brand.map(str::to_string),
            category: category.to_string(),
            thumbnail: format!("https://cdn.example.com/{id}/thumbnail.webp"),
            images: vec![format!("https://cdn.example.com/{id}/1.webp")],
        }
    }
}
