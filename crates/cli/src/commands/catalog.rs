//! Catalog feed commands.
//!
//! # Usage
//!
//! ```bash
//! tenun-cli catalog parse feed.xml
//! tenun-cli catalog stats --url https://tenun.example/feed.xml
//! ```
//!
//! # Environment Variables
//!
//! - `CATALOG_FEED_URL` - Feed URL used when no source is given
//! - `CATALOG_FEED_PATH` - Feed file used when no source or URL is given

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use tenun_core::catalog::parse_rss_to_products;
use tenun_core::{Category, FeedError, Product, format_price};
use thiserror::Error;

/// Errors that can occur during catalog commands.
#[derive(Debug, Error)]
pub enum CatalogCommandError {
    /// No feed given on the command line or in the environment.
    #[error("No feed given: pass FILE or --url, or set CATALOG_FEED_URL / CATALOG_FEED_PATH")]
    MissingSource,

    /// Feed download failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Feed server answered with a non-success status.
    #[error("Feed returned status {0}")]
    Status(reqwest::StatusCode),

    /// Feed file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Feed document is not well-formed.
    #[error("Feed parse error: {0}")]
    Parse(#[from] FeedError),

    /// Products could not be encoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Some products break the catalog invariants.
    #[error("{0} product(s) violate catalog invariants")]
    InvalidProducts(usize),
}

/// Where to read the feed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    File(PathBuf),
    Url(String),
}

impl FeedSource {
    /// Pick the feed source: command-line arguments first, then the
    /// `CATALOG_FEED_URL` and `CATALOG_FEED_PATH` values.
    ///
    /// # Errors
    ///
    /// Returns `MissingSource` if nothing is set.
    pub fn resolve(
        file: Option<PathBuf>,
        url: Option<String>,
        env_url: Option<String>,
        env_path: Option<String>,
    ) -> Result<Self, CatalogCommandError> {
        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        file.map(Self::File)
            .or_else(|| url.map(Self::Url))
            .or_else(|| non_empty(env_url).map(Self::Url))
            .or_else(|| non_empty(env_path).map(|p| Self::File(PathBuf::from(p))))
            .ok_or(CatalogCommandError::MissingSource)
    }
}

impl fmt::Display for FeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => write!(f, "{url}"),
        }
    }
}

async fn load(source: &FeedSource) -> Result<Vec<Product>, CatalogCommandError> {
    tracing::info!(%source, "Loading feed");

    let xml = match source {
        FeedSource::File(path) => {
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| CatalogCommandError::Io {
                    path: path.clone(),
                    source,
                })?
        }
        FeedSource::Url(url) => {
            let response = reqwest::get(url).await?;
            check_status(response.status())?;
            response.text().await?
        }
    };

    let products = parse_rss_to_products(&xml)?;
    tracing::info!(count = products.len(), "Feed normalized");
    Ok(products)
}

fn check_status(status: reqwest::StatusCode) -> Result<(), CatalogCommandError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(CatalogCommandError::Status(status))
    }
}

/// Print the normalized products of a feed as pretty JSON.
///
/// # Errors
///
/// Returns an error if the feed cannot be read or parsed.
pub async fn parse(source: &FeedSource) -> Result<(), CatalogCommandError> {
    let products = load(source).await?;

    #[allow(clippy::print_stdout)]
    {
        println!("{}", serde_json::to_string_pretty(&products)?);
    }
    Ok(())
}

/// Print catalog statistics and check every product's invariants.
///
/// # Errors
///
/// Returns `InvalidProducts` if any product breaks an invariant, after the
/// report has been printed.
pub async fn stats(source: &FeedSource) -> Result<(), CatalogCommandError> {
    let products = load(source).await?;
    let stats = CatalogStats::compute(&products);

    #[allow(clippy::print_stdout)]
    {
        print!("{stats}");
    }

    if stats.violations.is_empty() {
        Ok(())
    } else {
        for (id, problems) in &stats.violations {
            tracing::warn!(product = %id, problems = ?problems, "Invalid product");
        }
        Err(CatalogCommandError::InvalidProducts(stats.violations.len()))
    }
}

/// Summary of a normalized catalog.
#[derive(Debug)]
pub struct CatalogStats {
    pub total: usize,
    pub in_stock: usize,
    pub by_category: BTreeMap<Category, usize>,
    /// Lowest and highest price, `None` for an empty catalog.
    pub price_range: Option<(Product, Product)>,
    /// Product ID (or position) with the invariants it breaks.
    pub violations: Vec<(String, Vec<&'static str>)>,
}

impl CatalogStats {
    /// Summarize `products`.
    #[must_use]
    pub fn compute(products: &[Product]) -> Self {
        let mut by_category: BTreeMap<Category, usize> =
            Category::ALL.into_iter().map(|c| (c, 0)).collect();
        for product in products {
            *by_category.entry(product.category).or_default() += 1;
        }

        let cheapest = products.iter().min_by_key(|p| p.price);
        let priciest = products.iter().max_by_key(|p| p.price);

        let violations = products
            .iter()
            .enumerate()
            .filter_map(|(index, product)| {
                let problems = invariant_violations(product);
                if problems.is_empty() {
                    return None;
                }
                let label = if product.id.is_empty() {
                    format!("#{index}")
                } else {
                    product.id.to_string()
                };
                Some((label, problems))
            })
            .collect();

        Self {
            total: products.len(),
            in_stock: products.iter().filter(|p| p.in_stock).count(),
            by_category,
            price_range: cheapest.zip(priciest).map(|(lo, hi)| (lo.clone(), hi.clone())),
            violations,
        }
    }

    /// Share of products in stock, 0.0 for an empty catalog.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn stock_ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.in_stock as f64 / self.total as f64
        }
    }
}

impl fmt::Display for CatalogStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Products: {}", self.total)?;
        writeln!(
            f,
            "In stock: {} ({:.1}%)",
            self.in_stock,
            self.stock_ratio() * 100.0
        )?;
        if let Some((lo, hi)) = &self.price_range {
            writeln!(
                f,
                "Price range: {} - {}",
                format_price(lo.price, lo.currency),
                format_price(hi.price, hi.currency)
            )?;
        }
        writeln!(f, "Categories:")?;
        for (category, count) in &self.by_category {
            writeln!(f, "  {category:<8} {count}")?;
        }
        if !self.violations.is_empty() {
            writeln!(f, "Invalid products: {}", self.violations.len())?;
            for (id, problems) in &self.violations {
                writeln!(f, "  {id}: {}", problems.join(", "))?;
            }
        }
        Ok(())
    }
}

/// The product invariants `product` breaks, empty when it is valid.
#[must_use]
pub fn invariant_violations(product: &Product) -> Vec<&'static str> {
    let mut problems = Vec::new();
    if product.id.is_empty() {
        problems.push("empty id");
    }
    if product.slug.is_empty() {
        problems.push("empty slug");
    }
    if product.title.is_empty() {
        problems.push("empty title");
    }
    if product.price <= 0 {
        problems.push("non-positive price");
    }
    if !(0.0..=5.0).contains(&product.rating) {
        problems.push("rating out of range");
    }
    problems
}
