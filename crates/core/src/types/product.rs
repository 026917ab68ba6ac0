//! Catalog product record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Category, CurrencyCode, ProductId};

/// A catalog product.
///
/// Products are rebuilt from the feed on every catalog load and never
/// mutated afterwards. JSON field names are camelCase, the same shape the
/// cart persistence format embeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    /// URL-safe handle, unique within one feed.
    pub slug: String,
    pub title: String,
    /// Plain-text description (HTML already stripped).
    pub description: String,
    /// Image URL or site-relative placeholder path.
    pub image: String,
    /// Price in the smallest unit of `currency`.
    pub price: i64,
    #[serde(default)]
    pub currency: CurrencyCode,
    pub category: Category,
    #[serde(default)]
    pub tags: Vec<String>,
    pub in_stock: bool,
    /// Average review score, 0.0 to 5.0.
    pub rating: f64,
    pub sold: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

impl Product {
    /// Price formatted for display, e.g. `Rp 1.250.000`.
    #[must_use]
    pub fn price_display(&self) -> String {
        super::format_price(self.price, self.currency)
    }

    /// Returns `true` if the title, description, or any tag contains
    /// `needle` (case-insensitive). `needle` must already be lowercase.
    #[must_use]
    pub fn matches_search(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(needle))
    }
}

#[cfg(test)]
impl Product {
    /// Minimal product for unit tests.
    pub(crate) fn fixture(id: &str, price: i64) -> Self {
        Self {
            id: ProductId::new(id),
            slug: id.to_string(),
            title: format!("Kain {id}"),
            description: String::new(),
            image: "/images/placeholder.jpg".to_string(),
            price,
            currency: CurrencyCode::IDR,
            category: Category::Lainnya,
            tags: Vec::new(),
            in_stock: true,
            rating: 4.0,
            sold: 10,
            created_at: None,
            source_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_search_checks_tags() {
        let mut product = Product::fixture("p1", 750_000);
        product.tags = vec!["Sumba".to_string()];

        assert!(product.matches_search("kain"));
        assert!(product.matches_search("sumba"));
        assert!(!product.matches_search("batik"));
    }

    #[test]
    fn test_price_display() {
        let product = Product::fixture("p1", 750_000);
        assert_eq!(product.price_display(), "Rp 750.000");
    }
}
