//! Field-level normalization helpers.
//!
//! The feed carries no price, rating, sales, or stock data. Those fields are
//! derived from a hash of the product ID so that the same product shows the
//! same numbers on every catalog load without anything being stored.

use std::sync::LazyLock;

use regex::Regex;

use super::rss::RssItem;
use crate::types::Category;

/// Image used when an item carries neither an enclosure nor media content.
pub const PLACEHOLDER_IMAGE: &str = "/images/placeholder.jpg";

pub const MIN_PRICE: i64 = 500_000;
pub const MAX_PRICE: i64 = 2_500_000;
const PRICE_STEP: i64 = 1_000;

pub const MIN_RATING: f64 = 3.5;
pub const MAX_RATING: f64 = 5.0;

pub const MIN_SOLD: u32 = 10;
pub const MAX_SOLD: u32 = 509;

/// Keyword table for [`extract_category`]. Order matters: the first keyword
/// found wins.
const CATEGORY_KEYWORDS: &[(&str, Category)] = &[
    ("beragi", Category::Beragi),
    ("songket", Category::Songket),
    ("gringsing", Category::Ikat),
    ("ikat", Category::Ikat),
    ("endek", Category::Endek),
    ("ulos", Category::Ulos),
    ("sadum", Category::Ulos),
    ("lurik", Category::Lurik),
];

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("Invalid regex"));

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid regex"));

/// Pick the category whose keyword appears in the title or description.
///
/// Matching is case-insensitive against the keyword table in order; the
/// first hit wins. Returns [`Category::Lainnya`] when nothing matches.
#[must_use]
pub fn extract_category(title: &str, description: &str) -> Category {
    let haystack = format!("{title} {description}").to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(keyword, _)| haystack.contains(keyword))
        .map_or(Category::Lainnya, |(_, category)| *category)
}

/// 32-bit string hash (`h = h * 31 + unit` over UTF-16 units, wrapping),
/// returned as its absolute value.
#[must_use]
pub fn string_hash(value: &str) -> u32 {
    value
        .encode_utf16()
        .fold(0_i32, |hash, unit| {
            hash.wrapping_shl(5)
                .wrapping_sub(hash)
                .wrapping_add(i32::from(unit))
        })
        .unsigned_abs()
}

fn seed(id: &str, field: &str) -> u32 {
    string_hash(&format!("{id}:{field}"))
}

/// Deterministic price in `[MIN_PRICE, MAX_PRICE]`, a multiple of 1000.
#[must_use]
pub fn consistent_price(id: &str) -> i64 {
    let steps = (MAX_PRICE - MIN_PRICE) / PRICE_STEP + 1;
    MIN_PRICE + i64::from(seed(id, "price")) % steps * PRICE_STEP
}

/// Deterministic rating in `[MIN_RATING, MAX_RATING]` with one decimal.
#[must_use]
pub fn consistent_rating(id: &str) -> f64 {
    // 35..=50 tenths
    let tenths = 35 + seed(id, "rating") % 16;
    f64::from(tenths) / 10.0
}

/// Deterministic sales count in `[MIN_SOLD, MAX_SOLD]`.
#[must_use]
pub fn consistent_sold(id: &str) -> u32 {
    MIN_SOLD + seed(id, "sold") % (MAX_SOLD - MIN_SOLD + 1)
}

/// Deterministic stock flag; nine in ten products are in stock.
#[must_use]
pub fn consistent_in_stock(id: &str) -> bool {
    seed(id, "stock") % 10 != 0
}

/// Image URL for an item: enclosure first, then media content, then the
/// placeholder.
#[must_use]
pub fn extract_image(item: &RssItem) -> String {
    item.enclosure_url
        .as_deref()
        .or(item.media_content_url.as_deref())
        .unwrap_or(PLACEHOLDER_IMAGE)
        .to_string()
}

/// Remove HTML tags, decode common entities, and collapse whitespace.
#[must_use]
pub fn strip_html(html: &str) -> String {
    let without_tags = TAG_RE.replace_all(html, " ");
    let decoded = without_tags
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    WHITESPACE_RE.replace_all(&decoded, " ").trim().to_string()
}

/// Lowercase ASCII slug: runs of anything but letters and digits become a
/// single `-`, with no leading or trailing dash.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}
