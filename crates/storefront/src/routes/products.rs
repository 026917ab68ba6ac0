//! Product route handlers.
//!
//! Listing filters are read from the raw query string so that repeated and
//! comma-separated `category` values both work.

use axum::{
    Json,
    extract::{Path, RawQuery, State},
};
use serde::Serialize;
use tenun_core::{Category, FilterState, Product};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Product as returned by the API, with its formatted price.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    pub price_display: String,
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        let price_display = product.price_display();
        Self {
            product,
            price_display,
        }
    }
}

/// Product listing response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListing {
    pub products: Vec<ProductView>,
    pub total: usize,
    pub filters: FilterState,
    pub active_filters: usize,
    /// Canonical query string for the applied filters.
    pub query: String,
}

/// One entry of the category facet.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryFacet {
    pub category: Category,
    pub count: usize,
    pub selected: bool,
    /// Query string after toggling this category on the current filters.
    pub toggle_query: String,
}

/// Product listing page.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Json<ProductListing>> {
    let filters = FilterState::from_query(query.as_deref().unwrap_or_default());
    let products = state.catalog().products().await?;

    let matched = filters.apply(&products);
    tracing::debug!(
        total = products.len(),
        matched = matched.len(),
        "Applied listing filters"
    );

    Ok(Json(ProductListing {
        total: matched.len(),
        products: matched.into_iter().map(ProductView::from).collect(),
        active_filters: filters.active_count(),
        query: filters.to_query_string(),
        filters,
    }))
}

/// Product detail page.
#[instrument(skip(state), fields(slug = %slug))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ProductView>> {
    let product = state
        .catalog()
        .product_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product not found: {slug}")))?;

    Ok(Json(product.into()))
}

/// Category facet: every category with its product count.
///
/// Counts cover the whole catalog; `selected` and `toggleQuery` are relative
/// to the filters in the request query string.
#[instrument(skip(state))]
pub async fn categories(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Json<Vec<CategoryFacet>>> {
    let filters = FilterState::from_query(query.as_deref().unwrap_or_default());
    let products = state.catalog().products().await?;

    let facets = Category::ALL
        .into_iter()
        .map(|category| CategoryFacet {
            category,
            count: products.iter().filter(|p| p.category == category).count(),
            selected: filters.categories.contains(&category),
            toggle_query: filters.toggle_category(category).to_query_string(),
        })
        .collect();

    Ok(Json(facets))
}
