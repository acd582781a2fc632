//! HTTP client for the product catalog API.
//!
//! Speaks the DummyJSON product API:
//! - `GET /products?limit=N` returns a `{ products, total, skip, limit }`
//!   envelope
//! - `GET /products/{id}` returns a single product

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::CatalogSource;
use crate::error::{LoadError, NotFoundError};
use crate::state::data::{CatalogItem, ItemId};

/// Catalog source backed by the REST API
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    base_url: String,
}

/// Paged list envelope returned by the list endpoint
#[derive(Debug, Deserialize)]
struct ProductsResponse {
    products: Vec<CatalogItem>,
    #[serde(default)]
    total: usize,
}

impl HttpSource {
    /// Creates a new client for `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, LoadError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LoadError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Underlying client, shared with the image cache
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Lists the first `limit` products.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    pub async fn list_products(&self, limit: usize) -> Result<Vec<CatalogItem>, LoadError> {
        let url = format!("{}/products", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("limit", limit)])
            .send()
            .await?;

        let body = read_success(response).await?;
        let products = parse_products(&body)?;
        info!("Fetched {} products from {}", products.len(), self.base_url);
        Ok(products)
    }

    /// Gets one product.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError`] if the API has no such product or the
    /// request fails.
    pub async fn get_product(&self, id: ItemId) -> Result<CatalogItem, NotFoundError> {
        let url = format!("{}/products/{}", self.base_url, id);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| NotFoundError::caused_by(id, e.into()))?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("Product {} does not exist", id);
            return Err(NotFoundError::missing(id));
        }

        let body = read_success(response)
            .await
            .map_err(|e| NotFoundError::caused_by(id, e))?;
        serde_json::from_str(&body).map_err(|e| NotFoundError::caused_by(id, e.into()))
    }
}

impl CatalogSource for HttpSource {
    async fn fetch_catalog(&self, limit: usize) -> Result<Vec<CatalogItem>, LoadError> {
        self.list_products(limit).await.inspect_err(|e| {
            warn!("Failed to fetch products: {}", e);
        })
    }

    async fn fetch_item(&self, id: ItemId) -> Result<CatalogItem, NotFoundError> {
        self.get_product(id).await.inspect_err(|e| {
            warn!("Failed to fetch product {}: {:?}", id, e.cause);
        })
    }
}

/// Body of a 2xx response, or the status as an error
async fn read_success(response: reqwest::Response) -> Result<String, LoadError> {
    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::Status(status.as_u16()));
    }
    Ok(response.text().await?)
}

/// Parse a `{ products: [...] }` envelope
fn parse_products(body: &str) -> Result<Vec<CatalogItem>, LoadError> {
    let page: ProductsResponse = serde_json::from_str(body)?;
    debug!("Envelope reports {} products in total", page.total);
    Ok(page.products)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENVELOPE: &str = r#"{
        "products": [
            {
                "id": 1,
                "title": "Essence Mascara Lash Princess",
                "description": "Popular mascara",
                "category": "beauty",
                "price": 9.99,
                "discountPercentage": 7.17,
                "rating": 4.94,
                "stock": 5,
                "brand": "Essence",
                "thumbnail": "https://cdn.dummyjson.com/products/images/beauty/1/thumbnail.png",
                "images": ["https://cdn.dummyjson.com/products/images/beauty/1/1.png"]
            },
            {
                "id": 16,
                "title": "Apple",
                "description": "Fresh and crisp apples",
                "category": "groceries",
                "price": 1.99,
                "discountPercentage": 12.62,
                "rating": 2.96,
                "stock": 8,
                "thumbnail": "https://cdn.dummyjson.com/products/images/groceries/apple.png",
                "images": []
            }
        ],
        "total": 194,
        "skip": 0,
        "limit": 2
    }"#;

    #[test]
    fn test_parse_envelope_keeps_order() {
        let products = parse_products(ENVELOPE).unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].id, 1);
        assert_eq!(products[0].brand.as_deref(), Some("Essence"));
        assert_eq!(products[1].brand_or_unknown(), "Unknown");
    }

    #[test]
    fn test_parse_rejects_non_envelope() {
        let err = parse_products(r#"{"message": "Product with id '999' not found"}"#).unwrap_err();
        assert!(matches!(err, LoadError::Decode(_)));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let source = HttpSource::new("https://dummyjson.com/", Duration::from_secs(5)).unwrap();
        assert_eq!(source.base_url, "https://dummyjson.com");
    }
}
