//! Cart engine.
//!
//! A cart is an ordered list of [`CartItem`]s holding at most one entry per
//! product ID, each with a quantity of at least one. Every operation takes
//! the current items by reference and returns a new list; inputs are never
//! mutated.
//!
//! # Persistence
//!
//! [`serialize`] produces the single-string format stored by clients and
//! sessions:
//!
//! ```json
//! { "items": [{ "product": { ... }, "quantity": 2 }], "lastUpdated": "2026-01-01T00:00:00Z" }
//! ```
//!
//! [`deserialize`] never fails: malformed input yields an empty cart.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Product;

/// A product in the cart with its quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: Product,
    /// Always at least 1 for items held in a cart.
    pub quantity: u32,
}

impl CartItem {
    /// Price of this line: unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> i64 {
        self.product.price.saturating_mul(i64::from(self.quantity))
    }
}

/// Persisted cart: the items plus the time they were written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartState {
    pub items: Vec<CartItem>,
    pub last_updated: DateTime<Utc>,
}

impl CartState {
    /// Wrap items with the current time.
    #[must_use]
    pub fn new(items: Vec<CartItem>) -> Self {
        Self::at(items, Utc::now())
    }

    /// Wrap items with an explicit timestamp.
    #[must_use]
    pub const fn at(items: Vec<CartItem>, last_updated: DateTime<Utc>) -> Self {
        Self {
            items,
            last_updated,
        }
    }
}

/// Add `quantity` of `product`.
///
/// Increments the existing line when the product is already in the cart,
/// otherwise appends a new line. A quantity of zero leaves the cart as is.
#[must_use]
pub fn add_item(items: &[CartItem], product: &Product, quantity: u32) -> Vec<CartItem> {
    let mut next = items.to_vec();
    if quantity == 0 {
        return next;
    }

    match next.iter_mut().find(|item| item.product.id == product.id) {
        Some(existing) => existing.quantity = existing.quantity.saturating_add(quantity),
        None => next.push(CartItem {
            product: product.clone(),
            quantity,
        }),
    }
    next
}

/// Remove the line for `product_id`. Unknown IDs leave the cart unchanged.
#[must_use]
pub fn remove_item(items: &[CartItem], product_id: &str) -> Vec<CartItem> {
    items
        .iter()
        .filter(|item| item.product.id != product_id)
        .cloned()
        .collect()
}

/// Set the quantity of the line for `product_id`.
///
/// A quantity of zero or less removes the line. Other lines are untouched,
/// and an unknown ID leaves the cart unchanged.
#[must_use]
pub fn update_quantity(items: &[CartItem], product_id: &str, quantity: i64) -> Vec<CartItem> {
    if quantity <= 0 {
        return remove_item(items, product_id);
    }
    let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);

    items
        .iter()
        .map(|item| {
            if item.product.id == product_id {
                CartItem {
                    product: item.product.clone(),
                    quantity,
                }
            } else {
                item.clone()
            }
        })
        .collect()
}

/// Sum of price times quantity over all lines; 0 for an empty cart.
#[must_use]
pub fn subtotal(items: &[CartItem]) -> i64 {
    items
        .iter()
        .fold(0_i64, |acc, item| acc.saturating_add(item.line_total()))
}

/// Total number of units across all lines (the cart badge count).
#[must_use]
pub fn item_count(items: &[CartItem]) -> u32 {
    items
        .iter()
        .fold(0_u32, |acc, item| acc.saturating_add(item.quantity))
}

/// Encode items with the current timestamp as a JSON string.
///
/// # Errors
///
/// Returns an error only if a product holds a value JSON cannot represent
/// (a non-finite rating).
pub fn serialize(items: &[CartItem]) -> Result<String, serde_json::Error> {
    serde_json::to_string(&CartState::new(items.to_vec()))
}

/// Decode the items of a persisted cart.
///
/// Returns an empty list for anything that is not a valid persisted cart.
/// Lines with a zero quantity are dropped and repeated product IDs are
/// merged, so the result always satisfies the cart invariants.
#[must_use]
pub fn deserialize(json: &str) -> Vec<CartItem> {
    try_deserialize(json).unwrap_or_default()
}

/// Like [`deserialize`], but reports why the input was rejected.
///
/// # Errors
///
/// Returns the JSON error if `json` is not a persisted cart.
pub fn try_deserialize(json: &str) -> Result<Vec<CartItem>, serde_json::Error> {
    #[derive(Deserialize)]
    struct Stored {
        items: Vec<CartItem>,
    }

    let stored: Stored = serde_json::from_str(json)?;

    Ok(stored
        .items
        .iter()
        .fold(Vec::new(), |acc, item| add_item(&acc, &item.product, item.quantity)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn cart_of(lines: &[(&str, i64, u32)]) -> Vec<CartItem> {
        lines
            .iter()
            .map(|(id, price, quantity)| CartItem {
                product: Product::fixture(id, *price),
                quantity: *quantity,
            })
            .collect()
    }

    #[test]
    fn test_add_item_merges_existing_product() {
        let cart = cart_of(&[("p1", 500_000, 2)]);
        let p1 = Product::fixture("p1", 500_000);

        let next = add_item(&cart, &p1, 3);

        assert_eq!(next.len(), 1);
        assert_eq!(next[0].quantity, 5);
        // Input is untouched.
        assert_eq!(cart[0].quantity, 2);
    }

    #[test]
    fn test_add_item_appends_new_product() {
        let cart = cart_of(&[("p1", 500_000, 1)]);
        let p2 = Product::fixture("p2", 900_000);

        let next = add_item(&cart, &p2, 1);

        assert_eq!(next.len(), 2);
        assert_eq!(next[1].product.id, "p2");
        assert_eq!(next[1].quantity, 1);
    }

    #[test]
    fn test_add_item_zero_quantity_is_noop() {
        let cart = cart_of(&[("p1", 500_000, 1)]);
        let p2 = Product::fixture("p2", 900_000);

        assert_eq!(add_item(&cart, &p2, 0), cart);
    }

    #[test]
    fn test_remove_item_absent_id_keeps_length() {
        let cart = cart_of(&[("p1", 500_000, 2)]);
        assert_eq!(remove_item(&cart, "p2").len(), 1);
        assert!(remove_item(&cart, "p1").is_empty());
    }

    #[test]
    fn test_update_quantity_zero_matches_remove() {
        let cart = cart_of(&[("p1", 500_000, 2), ("p2", 700_000, 1)]);

        for id in ["p1", "p2", "p3"] {
            assert_eq!(update_quantity(&cart, id, 0), remove_item(&cart, id));
            assert_eq!(update_quantity(&cart, id, -4), remove_item(&cart, id));
        }
    }

    #[test]
    fn test_update_quantity_replaces_only_target() {
        let cart = cart_of(&[("p1", 500_000, 2), ("p2", 700_000, 1)]);

        let next = update_quantity(&cart, "p2", 7);

        assert_eq!(next[0].quantity, 2);
        assert_eq!(next[1].quantity, 7);
    }

    #[test]
    fn test_subtotal() {
        assert_eq!(subtotal(&[]), 0);

        let cart = cart_of(&[("p1", 500_000, 2), ("p2", 1_250_000, 3)]);
        assert_eq!(subtotal(&cart), 500_000 * 2 + 1_250_000 * 3);
        assert_eq!(item_count(&cart), 5);
    }

    #[test]
    fn test_serialize_round_trip_preserves_lines() {
        let cart = cart_of(&[("p1", 500_000, 2), ("p2", 1_250_000, 3)]);

        let json = serialize(&cart).unwrap();
        let back = deserialize(&json);

        assert_eq!(back.len(), cart.len());
        for (a, b) in cart.iter().zip(&back) {
            assert_eq!(a.quantity, b.quantity);
            assert_eq!(a.product.id, b.product.id);
            assert_eq!(a.product.price, b.product.price);
            assert_eq!(a.product.title, b.product.title);
        }
    }

    #[test]
    fn test_serialize_uses_camel_case_envelope() {
        let json = serialize(&cart_of(&[("p1", 500_000, 1)])).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert!(value["lastUpdated"].is_string());
        assert_eq!(value["items"][0]["product"]["inStock"], true);
    }

    #[test]
    fn test_deserialize_invalid_json_is_empty() {
        assert!(deserialize("invalid json").is_empty());
        assert!(deserialize("").is_empty());
        assert!(deserialize("{\"items\": 3}").is_empty());
        assert!(deserialize("null").is_empty());
        assert!(try_deserialize("invalid json").is_err());
    }

    #[test]
    fn test_deserialize_restores_invariants() {
        let mut raw = cart_of(&[("p1", 500_000, 2), ("p2", 700_000, 0), ("p1", 500_000, 1)]);
        raw.push(CartItem {
            product: Product::fixture("p3", 100_000),
            quantity: 4,
        });
        let json = serde_json::to_string(&CartState::new(raw)).unwrap();

        let back = deserialize(&json);

        assert_eq!(back.len(), 2);
        assert_eq!(back[0].product.id, "p1");
        assert_eq!(back[0].quantity, 3);
        assert_eq!(back[1].product.id, "p3");
    }
}
