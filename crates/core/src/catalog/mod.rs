//! Catalog normalizer: RSS feed to [`Product`] records.
//!
//! Vendor feeds are sparse. Any item may lack a guid, link, title, or image,
//! and none of them carry commercial data. [`parse_rss_to_products`] fills
//! every gap so that each returned product satisfies the product invariants:
//!
//! - `id`, `slug` and `title` are non-empty, and `id`/`slug` are unique
//!   within the feed
//! - `price` is positive, `rating` lies in `0.0..=5.0`
//! - `category` is one of [`Category::ALL`]
//!
//! # Example
//!
//! ```rust
//! # use tenun_core::catalog::parse_rss_to_products;
//! # use tenun_core::Category;
//! let xml = r"<rss><channel><item><title>Kain Beragi halus</title></item></channel></rss>";
//! let products = parse_rss_to_products(xml)?;
//! assert_eq!(products[0].category, Category::Beragi);
//! assert_eq!(products[0].slug, "kain-beragi-halus");
//! # Ok::<(), tenun_core::FeedError>(())
//! ```

mod normalize;
pub mod rss;

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::types::{Category, CurrencyCode, Product, ProductId};

pub use normalize::{
    MAX_PRICE, MAX_RATING, MAX_SOLD, MIN_PRICE, MIN_RATING, MIN_SOLD, PLACEHOLDER_IMAGE,
    consistent_in_stock, consistent_price, consistent_rating, consistent_sold, extract_category,
    extract_image, slugify, string_hash, strip_html,
};
pub use rss::RssItem;

/// Title given to items that have none.
pub const FALLBACK_TITLE: &str = "Kain Tenun";

/// Errors produced while reading a feed document.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The document is not well-formed XML.
    #[error("Feed is not well-formed XML: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// Normalize every `<item>` of an RSS document into a [`Product`].
///
/// # Errors
///
/// Returns [`FeedError::Xml`] if the document is not well-formed XML.
/// Sparse or odd items never cause an error.
pub fn parse_rss_to_products(xml: &str) -> Result<Vec<Product>, FeedError> {
    let items = rss::parse_items(xml)?;

    let mut ids = HashSet::new();
    let mut slugs = HashSet::new();

    Ok(items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let id = unique(&mut ids, &item_id(item, index));
            let mut product = normalize_item(item, &id);
            product.slug = unique(&mut slugs, &product.slug);
            product
        })
        .collect())
}

/// Stable product ID for a feed item, hashed from its guid, link, or title.
///
/// `index` is the item's position in the feed, used only when the item has
/// none of those.
#[must_use]
pub fn item_id(item: &RssItem, index: usize) -> String {
    let source_key = [&item.guid, &item.link, &item.title]
        .into_iter()
        .map(|s| s.trim())
        .find(|s| !s.is_empty())
        .map_or_else(|| format!("item-{index}"), str::to_string);
    format!("tn-{:08x}", string_hash(&source_key))
}

/// Build a product with the given `id` from one feed item.
///
/// Price, rating, sold count and stock are all derived from `id`, so it must
/// already be the final, feed-unique ID.
#[must_use]
pub fn normalize_item(item: &RssItem, id: &str) -> Product {
    let title = Some(strip_html(&item.title))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| FALLBACK_TITLE.to_string());

    let raw_description = if item.description.trim().is_empty() {
        &item.content
    } else {
        &item.description
    };
    let description = strip_html(raw_description);

    let category = extract_category(&title, &description);

    let slug = Some(slugify(&title))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| id.to_string());

    Product {
        slug,
        description,
        image: extract_image(item),
        price: consistent_price(id),
        currency: CurrencyCode::IDR,
        category,
        tags: collect_tags(&item.categories, category),
        in_stock: consistent_in_stock(id),
        rating: consistent_rating(id),
        sold: consistent_sold(id),
        created_at: parse_pub_date(&item.pub_date),
        source_url: Some(item.link.trim().to_string()).filter(|l| !l.is_empty()),
        title,
        id: ProductId::new(id),
    }
}

fn collect_tags(feed_categories: &[String], category: Category) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    let derived = category.as_str().to_lowercase();
    for tag in feed_categories
        .iter()
        .map(|c| strip_html(c))
        .chain(std::iter::once(derived))
    {
        if !tag.is_empty() && !tags.iter().any(|t| t.eq_ignore_ascii_case(&tag)) {
            tags.push(tag);
        }
    }
    tags
}

fn parse_pub_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|date| date.with_timezone(&Utc))
}

/// Return `candidate`, or `candidate-2`, `candidate-3`, ... if already taken,
/// and record the result as taken.
fn unique(taken: &mut HashSet<String>, candidate: &str) -> String {
    let mut value = candidate.to_string();
    let mut n = 2;
    while taken.contains(&value) {
        value = format!("{candidate}-{n}");
        n += 1;
    }
    taken.insert(value.clone());
    value
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn assert_invariants(product: &Product) {
        assert!(!product.id.is_empty());
        assert!(!product.slug.is_empty());
        assert!(!product.title.is_empty());
        assert!(product.price > 0);
        assert!((0.0..=5.0).contains(&product.rating));
        assert!(Category::ALL.contains(&product.category));
    }

    #[test]
    fn test_full_item() {
        let xml = r#"<rss version="2.0"><channel><item>
            <guid>https://toko.example/p/42</guid>
            <title><![CDATA[Kain Songket <em>Pandai Sikek</em>]]></title>
            <link>https://toko.example/p/42</link>
            <description><![CDATA[<p>Songket   benang emas.</p>]]></description>
            <pubDate>Tue, 10 Jun 2025 08:00:00 +0700</pubDate>
            <category>Sumatra Barat</category>
            <enclosure url="https://cdn.toko.example/42.jpg" type="image/jpeg"/>
        </item></channel></rss>"#;

        let products = parse_rss_to_products(xml).unwrap();
        assert_eq!(products.len(), 1);
        let p = &products[0];

        assert_invariants(p);
        assert_eq!(p.title, "Kain Songket Pandai Sikek");
        assert_eq!(p.slug, "kain-songket-pandai-sikek");
        assert_eq!(p.description, "Songket benang emas.");
        assert_eq!(p.category, Category::Songket);
        assert_eq!(p.image, "https://cdn.toko.example/42.jpg");
        assert_eq!(p.tags, vec!["Sumatra Barat", "songket"]);
        assert_eq!(p.source_url.as_deref(), Some("https://toko.example/p/42"));
        assert_eq!(
            p.created_at.unwrap().to_rfc3339(),
            "2025-06-10T01:00:00+00:00"
        );
        assert_eq!(p.price, consistent_price(p.id.as_str()));
    }

    #[test]
    fn test_empty_items_still_satisfy_invariants() {
        let xml = "<rss><channel><item></item><item><title>   </title></item></channel></rss>";

        let products = parse_rss_to_products(xml).unwrap();

        assert_eq!(products.len(), 2);
        for p in &products {
            assert_invariants(p);
            assert_eq!(p.title, FALLBACK_TITLE);
            assert_eq!(p.category, Category::Lainnya);
            assert_eq!(p.image, PLACEHOLDER_IMAGE);
            assert_eq!(p.created_at, None);
            assert_eq!(p.source_url, None);
        }
        assert_ne!(products[0].id, products[1].id);
        assert_eq!(products[0].slug, "kain-tenun");
        assert_eq!(products[1].slug, "kain-tenun-2");
    }

    #[test]
    fn test_ids_are_stable_across_loads() {
        let xml = "<rss><channel><item><guid>abc</guid><title>Ulos Ragi</title></item></channel></rss>";

        let first = parse_rss_to_products(xml).unwrap();
        let second = parse_rss_to_products(xml).unwrap();

        assert_eq!(first, second);
        assert_eq!(first[0].id.as_str(), format!("tn-{:08x}", string_hash("abc")));

        let item = RssItem {
            guid: "abc".to_string(),
            ..RssItem::default()
        };
        assert_eq!(first[0].id.as_str(), item_id(&item, 7));
    }

    #[test]
    fn test_repeated_guid_gets_distinct_ids() {
        let xml = "<rss><channel>\
            <item><guid>same</guid><title>Endek Bali</title></item>\
            <item><guid>same</guid><title>Endek Bali</title></item>\
            </channel></rss>";

        let products = parse_rss_to_products(xml).unwrap();

        assert_ne!(products[0].id, products[1].id);
        assert_ne!(products[0].slug, products[1].slug);
        assert!(products[1].id.as_str().ends_with("-2"));
    }

    #[test]
    fn test_repeated_guid_derives_fields_from_final_id() {
        let xml = "<rss><channel>\
            <item><guid>same</guid><title>Ulos Sadum</title></item>\
            <item><guid>same</guid><title>Ulos Sadum</title></item>\
            <item><guid>same</guid><title>Ulos Sadum</title></item>\
            </channel></rss>";

        let products = parse_rss_to_products(xml).unwrap();

        assert_eq!(products.len(), 3);
        for p in &products {
            let id = p.id.as_str();
            assert_eq!(p.price, consistent_price(id));
            assert!((p.rating - consistent_rating(id)).abs() < f64::EPSILON);
            assert_eq!(p.sold, consistent_sold(id));
            assert_eq!(p.in_stock, consistent_in_stock(id));
        }
    }

    #[test]
    fn test_content_encoded_backs_up_description() {
        let xml = r#"<rss xmlns:content="http://purl.org/rss/1.0/modules/content/"><channel><item>
            <title>Selendang</title>
            <content:encoded><![CDATA[<p>Motif lurik klasik</p>]]></content:encoded>
        </item></channel></rss>"#;

        let products = parse_rss_to_products(xml).unwrap();

        assert_eq!(products[0].description, "Motif lurik klasik");
        assert_eq!(products[0].category, Category::Lurik);
    }

    #[test]
    fn test_malformed_xml_is_error() {
        assert!(parse_rss_to_products("<rss><channel><item></channel></rss>").is_err());
    }
}
