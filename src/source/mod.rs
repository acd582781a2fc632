/// Catalog sources
///
/// Where the product data comes from. The state engine never fetches
/// anything itself; the app asks a `CatalogSource` and feeds the outcome
/// back in.
/// - REST API client (http.rs)
/// - SQLite snapshot cache wrapping another source (library.rs)
use std::future::Future;

use crate::error::{LoadError, NotFoundError};
use crate::state::data::{CatalogItem, ItemId};

pub mod http;
pub mod library;

pub use http::HttpSource;
pub use library::CachedSource;

/// Catalog Source + Detail Source collaborator
///
/// Implementations are cheap to clone so a copy can be moved into each
/// background task. Retry and caching policy live here, not in the engine.
pub trait CatalogSource: Clone + Send + Sync + 'static {
    /// Fetch up to `limit` products, in catalog order
    fn fetch_catalog(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<CatalogItem>, LoadError>> + Send;

    /// Fetch a single product
    fn fetch_item(
        &self,
        id: ItemId,
    ) -> impl Future<Output = Result<CatalogItem, NotFoundError>> + Send;
}

/// The source the app actually talks to
///
/// Chosen at startup from configuration.
#[derive(Debug, Clone)]
pub enum ActiveSource {
    Direct(HttpSource),
    Cached(CachedSource<HttpSource>),
}

impl CatalogSource for ActiveSource {
    async fn fetch_catalog(&self, limit: usize) -> Result<Vec<CatalogItem>, LoadError> {
        match self {
            ActiveSource::Direct(source) => source.fetch_catalog(limit).await,
            ActiveSource::Cached(source) => source.fetch_catalog(limit).await,
        }
    }

    async fn fetch_item(&self, id: ItemId) -> Result<CatalogItem, NotFoundError> {
        match self {
            ActiveSource::Direct(source) => source.fetch_item(id).await,
            ActiveSource::Cached(source) => source.fetch_item(id).await,
        }
    }
}
