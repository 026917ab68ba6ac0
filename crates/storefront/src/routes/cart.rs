//! Cart route handlers.
//!
//! The cart lives entirely in the session: the `cart` key holds the string
//! produced by `tenun_core::cart::serialize`. Every mutation loads the items,
//! applies one cart operation, and writes the result back.

use axum::{Form, Json, extract::State};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tenun_core::cart::{self, CartItem};
use tenun_core::{CurrencyCode, format_price};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::models::session_keys;
use crate::state::AppState;

/// Cart line as returned by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemView {
    pub product_id: String,
    pub slug: String,
    pub title: String,
    pub image: String,
    pub quantity: u32,
    pub unit_price: i64,
    pub unit_price_display: String,
    pub line_total: i64,
    pub line_total_display: String,
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        let line_total = item.line_total();
        Self {
            product_id: item.product.id.to_string(),
            slug: item.product.slug.clone(),
            title: item.product.title.clone(),
            image: item.product.image.clone(),
            quantity: item.quantity,
            unit_price: item.product.price,
            unit_price_display: item.product.price_display(),
            line_total,
            line_total_display: format_price(line_total, item.product.currency),
        }
    }
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: i64,
    pub subtotal_display: String,
    pub item_count: u32,
}

impl From<&[CartItem]> for CartView {
    fn from(items: &[CartItem]) -> Self {
        let subtotal = cart::subtotal(items);
        // Feeds are single-currency; fall back to the shop default when empty.
        let currency = items
            .first()
            .map_or_else(CurrencyCode::default, |item| item.product.currency);

        Self {
            items: items.iter().map(CartItemView::from).collect(),
            subtotal,
            subtotal_display: format_price(subtotal, currency),
            item_count: cart::item_count(items),
        }
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Load the cart items from the session.
///
/// A stored value that does not decode is treated as an empty cart.
async fn load_cart(session: &Session) -> Result<Vec<CartItem>> {
    let Some(stored) = session.get::<String>(session_keys::CART).await? else {
        return Ok(Vec::new());
    };

    Ok(cart::try_deserialize(&stored).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Discarding unreadable cart in session");
        Vec::new()
    }))
}

/// Persist the cart items to the session.
async fn save_cart(session: &Session, items: &[CartItem]) -> Result<()> {
    let encoded = cart::serialize(items)?;
    session.insert(session_keys::CART, encoded).await?;
    Ok(())
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    pub quantity: Option<u32>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: String,
    pub quantity: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: String,
}

/// Display the cart.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<Json<CartView>> {
    let items = load_cart(&session).await?;
    Ok(Json(CartView::from(items.as_slice())))
}

/// Add a product to the cart.
///
/// The product is looked up in the catalog so the cart stores a full
/// snapshot of it. Quantity defaults to 1.
#[instrument(skip(state, session), fields(product_id = %form.product_id))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Json<CartView>> {
    let quantity = form.quantity.unwrap_or(1);
    if quantity == 0 {
        return Err(AppError::BadRequest(
            "quantity must be at least 1".to_string(),
        ));
    }

    let product = state
        .catalog()
        .product_by_id(&form.product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product not found: {}", form.product_id)))?;

    let items = cart::add_item(&load_cart(&session).await?, &product, quantity);
    save_cart(&session, &items).await?;

    let quantity = quantity.to_string();
    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[
            ("product_id", form.product_id.as_str()),
            ("quantity", quantity.as_str()),
        ]),
    );

    Ok(Json(CartView::from(items.as_slice())))
}

/// Set the quantity of a cart line. Zero or less removes the line.
#[instrument(skip(session), fields(product_id = %form.product_id, quantity = form.quantity))]
pub async fn update(
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> Result<Json<CartView>> {
    let items = cart::update_quantity(
        &load_cart(&session).await?,
        &form.product_id,
        form.quantity,
    );
    save_cart(&session, &items).await?;

    add_breadcrumb(
        "cart",
        "Updated cart quantity",
        Some(&[("product_id", form.product_id.as_str())]),
    );

    Ok(Json(CartView::from(items.as_slice())))
}

/// Remove a line from the cart.
#[instrument(skip(session), fields(product_id = %form.product_id))]
pub async fn remove(
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Json<CartView>> {
    let items = cart::remove_item(&load_cart(&session).await?, &form.product_id);
    save_cart(&session, &items).await?;

    add_breadcrumb(
        "cart",
        "Removed from cart",
        Some(&[("product_id", form.product_id.as_str())]),
    );

    Ok(Json(CartView::from(items.as_slice())))
}

/// Empty the cart.
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Result<Json<CartView>> {
    session.remove::<String>(session_keys::CART).await?;
    add_breadcrumb("cart", "Cleared cart", None);
    Ok(Json(CartView::from(&[] as &[CartItem])))
}

/// Cart badge count.
#[instrument(skip(session))]
pub async fn count(session: Session) -> Result<Json<Value>> {
    let items = load_cart(&session).await?;
    Ok(Json(json!({ "count": cart::item_count(&items) })))
}
