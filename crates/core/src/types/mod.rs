//! Core types for Tenun.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod id;
pub mod price;
pub mod product;

pub use category::{Category, ParseCategoryError};
pub use id::ProductId;
pub use price::{CurrencyCode, format_price};
pub use product::Product;
