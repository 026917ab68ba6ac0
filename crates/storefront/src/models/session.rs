//! Session-related types.

/// Session keys for storefront data.
pub mod keys {
    /// Key for the persisted cart (the string produced by
    /// `tenun_core::cart::serialize`).
    pub const CART: &str = "cart";
}
