//! Runtime configuration.
//!
//! Every setting can come from a command-line flag or an environment
//! variable:
//!
//! - `STOREFRONT_API_URL` - catalog API endpoint (default: `https://dummyjson.com`)
//! - `STOREFRONT_CATALOG_LIMIT` - number of products to load
//! - `STOREFRONT_REVALIDATE_SECS` - how long a cached catalog counts as fresh
//! - `STOREFRONT_CACHE_DIR` - where snapshots and images are cached

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::state::debounce::SEARCH_DEBOUNCE;

/// Product-browsing storefront.
#[derive(Debug, Clone, Parser)]
#[command(name = "storefront")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Catalog API base URL.
    #[arg(long, env = "STOREFRONT_API_URL", default_value = "https://dummyjson.com")]
    pub api_url: String,

    /// Number of products to fetch.
    #[arg(long, env = "STOREFRONT_CATALOG_LIMIT", default_value_t = 100)]
    pub catalog_limit: usize,

    /// Seconds a cached catalog is served without asking the API.
    #[arg(long, env = "STOREFRONT_REVALIDATE_SECS", default_value_t = 60)]
    pub revalidate_secs: u64,

    /// Pause after the last keystroke before a search runs.
    #[arg(
        long,
        env = "STOREFRONT_SEARCH_DEBOUNCE_MS",
        default_value_t = SEARCH_DEBOUNCE.as_millis() as u64
    )]
    pub search_debounce_ms: u64,

    /// HTTP request timeout.
    #[arg(long, env = "STOREFRONT_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Cache directory (defaults to the platform cache dir).
    #[arg(long, env = "STOREFRONT_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Always fetch from the API; don't read or write the catalog snapshot.
    #[arg(long, env = "STOREFRONT_NO_CACHE")]
    pub no_cache: bool,
}

impl Config {
    pub fn revalidate(&self) -> Duration {
        Duration::from_secs(self.revalidate_secs)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Root of all cached files.
    ///
    /// Returns ~/.cache/storefront on Linux unless overridden.
    pub fn cache_root(&self) -> PathBuf {
        if let Some(dir) = &self.cache_dir {
            return dir.clone();
        }

        dirs::cache_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(std::env::temp_dir)
            .join("storefront")
    }

    /// Location of the catalog snapshot database
    pub fn snapshot_path(&self) -> PathBuf {
        self.cache_root().join("catalog.db")
    }
}
