//! Tenun Core - Domain library for the Tenun storefront.
//!
//! This crate provides the logic shared by every Tenun component:
//! - `storefront` - JSON storefront service (catalog, cart, filters)
//! - `cli` - Command-line tools for inspecting catalog feeds
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no network, no
//! database, no HTTP framework. Callers own all I/O and hand the core plain
//! strings (feed XML, query strings, persisted cart JSON).
//!
//! # Modules
//!
//! - [`types`] - Products, categories, prices and typed IDs
//! - [`cart`] - Cart engine and its JSON persistence format
//! - [`filter`] - Catalog filter state and query-string synchronization
//! - [`catalog`] - RSS feed normalizer producing [`Product`] records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod filter;
pub mod types;

pub use cart::{CartItem, CartState};
pub use catalog::FeedError;
pub use filter::{FilterState, SortOrder};
pub use types::*;
