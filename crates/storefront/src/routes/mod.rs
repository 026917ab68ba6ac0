//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (catalog loads)
//!
//! # Catalog
//! GET  /products               - Filtered product listing
//! GET  /products/{slug}        - Product detail
//! GET  /categories             - Category facet with counts
//!
//! # Cart (session-backed)
//! GET  /cart                   - Cart view
//! POST /cart/add               - Add product (form: product_id, quantity?)
//! POST /cart/update            - Set quantity (form: product_id, quantity)
//! POST /cart/remove            - Remove line (form: product_id)
//! POST /cart/clear             - Empty the cart
//! GET  /cart/count             - Badge count
//! ```

pub mod cart;
pub mod health;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/products", get(products::index))
        .route("/products/{slug}", get(products::show))
        .route("/categories", get(products::categories))
        .route("/cart", get(cart::show))
        .nest("/cart", cart_routes())
}
