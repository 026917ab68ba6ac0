//! Filter query commands.
//!
//! # Usage
//!
//! ```bash
//! tenun-cli filter normalize "?inStock=true&category=ikat&category=Songket"
//! ```

use tenun_core::FilterState;

/// Canonical form of a listing query string.
#[derive(Debug, PartialEq, Eq)]
pub struct NormalizedQuery {
    pub query: String,
    pub active_filters: usize,
}

impl NormalizedQuery {
    /// Parse `query` and re-serialize it in canonical parameter order.
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let filters = FilterState::from_query(query);
        Self {
            query: filters.to_query_string(),
            active_filters: filters.active_count(),
        }
    }
}

/// Print the canonical query string and the active filter count.
pub fn normalize(query: &str) {
    let normalized = NormalizedQuery::from_query(query);
    tracing::debug!(input = query, ?normalized, "Normalized filter query");

    #[allow(clippy::print_stdout)]
    {
        println!("query: {}", normalized.query);
        println!("active filters: {}", normalized.active_filters);
    }
}
