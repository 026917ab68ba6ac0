//! Catalog client: loads the product feed and caches the normalized products.
//!
//! # Architecture
//!
//! - The feed is the source of truth; nothing is stored locally
//! - The feed is read from a URL (`reqwest`) or a file (`tokio::fs`)
//! - The normalized product list is cached in `moka` for the configured TTL
//! - Concurrent misses share a single load
//!
//! # Example
//!
//! ```rust,ignore
//! use tenun_storefront::catalog::CatalogClient;
//!
//! let client = CatalogClient::new(&config.catalog);
//! let products = client.products().await?;
//! let product = client.product_by_slug("kain-songket-pandai-sikek").await?;
//! ```

use std::sync::Arc;

use moka::future::Cache;
use tenun_core::catalog::parse_rss_to_products;
use tenun_core::{FeedError, Product};
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::config::{CatalogConfig, CatalogSource};

/// Errors that can occur while loading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request for the feed failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Feed server answered with a non-success status.
    #[error("Feed returned status {0}")]
    Status(reqwest::StatusCode),

    /// Reading the feed file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Feed document could not be parsed.
    #[error("Feed parse error: {0}")]
    Parse(#[from] FeedError),

    /// A load failure shared with other requests waiting on the same load.
    #[error(transparent)]
    Shared(Arc<CatalogError>),
}

impl CatalogError {
    /// The underlying error, looking through [`CatalogError::Shared`].
    #[must_use]
    pub fn root(&self) -> &Self {
        match self {
            Self::Shared(inner) => inner.root(),
            other => other,
        }
    }
}

/// Cached catalog; the unit key holds the whole product list.
type CatalogCache = Cache<(), Arc<Vec<Product>>>;

/// Client for the product catalog feed.
///
/// Cheaply cloneable; clones share the HTTP client and cache.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    source: CatalogSource,
    cache: CatalogCache,
}

impl CatalogClient {
    /// Create a new catalog client.
    #[must_use]
    pub fn new(config: &CatalogConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(config.cache_ttl)
            .build();

        Self {
            inner: Arc::new(CatalogClientInner {
                client: reqwest::Client::new(),
                source: config.source.clone(),
                cache,
            }),
        }
    }

    /// Where this client reads the feed from.
    #[must_use]
    pub fn source(&self) -> &CatalogSource {
        &self.inner.source
    }

    /// All products, in feed order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the feed cannot be fetched or parsed. Errors
    /// are not cached; the next call tries again.
    pub async fn products(&self) -> Result<Arc<Vec<Product>>, CatalogError> {
        self.inner
            .cache
            .try_get_with((), self.load())
            .await
            .map_err(unwrap_shared)
    }

    /// Look up a product by its slug.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the catalog cannot be loaded.
    pub async fn product_by_slug(&self, slug: &str) -> Result<Option<Product>, CatalogError> {
        let products = self.products().await?;
        Ok(products.iter().find(|p| p.slug == slug).cloned())
    }

    /// Look up a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the catalog cannot be loaded.
    pub async fn product_by_id(&self, id: &str) -> Result<Option<Product>, CatalogError> {
        let products = self.products().await?;
        Ok(products.iter().find(|p| p.id == id).cloned())
    }

    /// Drop the cached catalog so the next read goes to the feed.
    pub async fn invalidate(&self) {
        self.inner.cache.invalidate(&()).await;
    }

    #[instrument(skip(self), fields(source = %self.inner.source))]
    async fn load(&self) -> Result<Arc<Vec<Product>>, CatalogError> {
        let xml = match &self.inner.source {
            CatalogSource::Url(url) => {
                debug!("Fetching catalog feed");
                let response = self.inner.client.get(url.clone()).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(CatalogError::Status(status));
                }
                response.text().await?
            }
            CatalogSource::File(path) => {
                debug!("Reading catalog feed file");
                tokio::fs::read_to_string(path).await?
            }
        };

        let products = parse_rss_to_products(&xml)?;
        info!(count = products.len(), "Catalog loaded");
        Ok(Arc::new(products))
    }
}

/// moka hands errors back behind an `Arc` shared by every waiter.
fn unwrap_shared(err: Arc<CatalogError>) -> CatalogError {
    Arc::try_unwrap(err).unwrap_or_else(CatalogError::Shared)
}
