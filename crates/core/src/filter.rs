//! Catalog filter state and its query-string form.
//!
//! The URL is the only place filter state lives: it is parsed on every
//! request with [`FilterState::from_query`] and written back with
//! [`FilterState::to_query_string`]. Keys equal to their default are left out
//! so that an unfiltered catalog has an empty query string.
//!
//! | Key        | Value                                     |
//! |------------|-------------------------------------------|
//! | `category` | comma-separated category names            |
//! | `minPrice` | integer, smallest currency unit           |
//! | `maxPrice` | integer, smallest currency unit           |
//! | `inStock`  | `true`                                    |
//! | `sort`     | `newest`, `price-asc`, `price-desc`, `bestselling`, `rating` |
//! | `q`        | free-text search                          |

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::types::{Category, Product};

pub const KEY_CATEGORY: &str = "category";
pub const KEY_MIN_PRICE: &str = "minPrice";
pub const KEY_MAX_PRICE: &str = "maxPrice";
pub const KEY_IN_STOCK: &str = "inStock";
pub const KEY_SORT: &str = "sort";
pub const KEY_QUERY: &str = "q";

/// Catalog sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
    Bestselling,
    Rating,
}

impl SortOrder {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::Bestselling => "bestselling",
            Self::Rating => "rating",
        }
    }

    /// Parse a sort value, falling back to [`SortOrder::Newest`] for anything
    /// unrecognized.
    #[must_use]
    pub fn parse_or_default(value: &str) -> Self {
        match value.trim() {
            "price-asc" => Self::PriceAsc,
            "price-desc" => Self::PriceDesc,
            "bestselling" => Self::Bestselling,
            "rating" => Self::Rating,
            _ => Self::Newest,
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User-selected catalog narrowing criteria.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    /// Selected categories. Set semantics, but insertion order is kept so
    /// the generated URL is stable.
    pub categories: Vec<Category>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub in_stock_only: bool,
    pub sort: SortOrder,
    pub q: Option<String>,
}

impl FilterState {
    /// Build filter state from a raw query string (without the leading `?`).
    ///
    /// Malformed values fall back to their defaults: unknown sort values
    /// become `newest`, unparseable or negative prices become `None`,
    /// unknown category names are skipped, and `inStock` is only set by the
    /// literal `true`.
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let mut filters = Self::default();

        for (key, value) in form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
            match key.as_ref() {
                KEY_CATEGORY => {
                    for name in value.split(',') {
                        if let Ok(category) = name.parse::<Category>() {
                            filters.add_category(category);
                        }
                    }
                }
                KEY_MIN_PRICE => filters.min_price = parse_price(&value),
                KEY_MAX_PRICE => filters.max_price = parse_price(&value),
                KEY_IN_STOCK => filters.in_stock_only = value == "true",
                KEY_SORT => filters.sort = SortOrder::parse_or_default(&value),
                KEY_QUERY => {
                    let trimmed = value.trim();
                    filters.q = (!trimmed.is_empty()).then(|| trimmed.to_string());
                }
                _ => {}
            }
        }

        filters
    }

    /// Query parameters for this state, omitting every key at its default.
    ///
    /// Values are written the way [`FilterState::from_query`] reads them:
    /// repeated categories once, negative prices and blank search text not
    /// at all, search text trimmed.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        let mut names: Vec<&str> = Vec::new();
        for category in &self.categories {
            if !names.contains(&category.as_str()) {
                names.push(category.as_str());
            }
        }
        if !names.is_empty() {
            pairs.push((KEY_CATEGORY, names.join(",")));
        }
        if let Some(min) = self.min_price.filter(|n| *n >= 0) {
            pairs.push((KEY_MIN_PRICE, min.to_string()));
        }
        if let Some(max) = self.max_price.filter(|n| *n >= 0) {
            pairs.push((KEY_MAX_PRICE, max.to_string()));
        }
        if self.in_stock_only {
            pairs.push((KEY_IN_STOCK, "true".to_string()));
        }
        if self.sort != SortOrder::Newest {
            pairs.push((KEY_SORT, self.sort.as_str().to_string()));
        }
        if let Some(q) = self.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            pairs.push((KEY_QUERY, q.to_string()));
        }

        pairs
    }

    /// The canonical form of this state: what a round trip through the URL
    /// yields.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self::from_query(&self.to_query_string())
    }

    /// Form-urlencoded query string, empty when every filter is at its
    /// default.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.to_query_pairs())
            .finish()
    }

    /// Add the category if it is not selected, remove it if it is.
    #[must_use]
    pub fn toggle_category(&self, category: Category) -> Self {
        let mut next = self.clone();
        if next.categories.contains(&category) {
            next.categories.retain(|c| *c != category);
        } else {
            next.categories.push(category);
        }
        next
    }

    /// Number of active narrowing constraints, for the filter badge.
    ///
    /// Each selected category counts once, as do each price bound and the
    /// stock toggle. Search text and sort order are not counted.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.categories.len()
            + usize::from(self.min_price.is_some())
            + usize::from(self.max_price.is_some())
            + usize::from(self.in_stock_only)
    }

    /// Returns `true` if nothing would be written to the URL.
    #[must_use]
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Reset every constraint and the sort order, keeping the search text.
    #[must_use]
    pub fn clear(&self) -> Self {
        Self {
            q: self.q.clone(),
            ..Self::default()
        }
    }

    /// Narrow and sort `products` according to this state.
    ///
    /// Categories match any-of, price bounds are inclusive, and the search
    /// text matches title, description, or tags case-insensitively. Sorting
    /// is stable, so feed order breaks ties.
    #[must_use]
    pub fn apply(&self, products: &[Product]) -> Vec<Product> {
        let needle = self.q.as_deref().map(str::to_lowercase);

        let mut matched: Vec<Product> = products
            .iter()
            .filter(|p| self.categories.is_empty() || self.categories.contains(&p.category))
            .filter(|p| self.min_price.is_none_or(|min| p.price >= min))
            .filter(|p| self.max_price.is_none_or(|max| p.price <= max))
            .filter(|p| !self.in_stock_only || p.in_stock)
            .filter(|p| needle.as_deref().is_none_or(|n| p.matches_search(n)))
            .cloned()
            .collect();

        match self.sort {
            SortOrder::Newest => matched.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            SortOrder::PriceAsc => matched.sort_by_key(|p| p.price),
            SortOrder::PriceDesc => matched.sort_by(|a, b| b.price.cmp(&a.price)),
            SortOrder::Bestselling => matched.sort_by(|a, b| b.sold.cmp(&a.sold)),
            SortOrder::Rating => matched.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
        }

        matched
    }

    fn add_category(&mut self, category: Category) {
        if !self.categories.contains(&category) {
            self.categories.push(category);
        }
    }
}

fn parse_price(value: &str) -> Option<i64> {
    value.trim().parse::<i64>().ok().filter(|n| *n >= 0)
}
