//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Every handler re-derives its rendering from a fresh `CartStore::list()`
//! and a fresh catalog fetch; the mutation's return value and the broadcast
//! payload are advisory only. Responses to mutations carry an
//! `HX-Trigger: cart-updated` header so other page fragments (the count
//! badge) refresh themselves.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use crate::cart::{LineItem, discount};
use crate::catalog::CatalogIndex;
use crate::filters;
use crate::state::AppState;

use super::categories::format_price;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub image: String,
    pub qty: u32,
    /// Quantity the decrease button requests (floored at 1, like the qty input).
    pub qty_dec: u32,
    /// Quantity the increase button requests.
    pub qty_inc: u32,
    pub unit_price: String,
    pub line_total: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub item_count: u64,
    pub subtotal: String,
    pub discount: String,
    /// Net total, floored at zero.
    pub total: String,
}

impl CartView {
    /// Create an empty cart view.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            item_count: 0,
            subtotal: format_price(Decimal::ZERO),
            discount: format_price(Decimal::ZERO),
            total: format_price(Decimal::ZERO),
        }
    }

    /// Build the display model from line items and a catalog index.
    ///
    /// Unknown products render with a fallback name and a zero unit price;
    /// the displayed total is `max(0, subtotal - discount)`.
    #[must_use]
    pub fn build(items: &[LineItem], index: &CatalogIndex) -> Self {
        let subtotal = discount::subtotal(items, index);
        let total_discount = discount::compute_discount(items, index);

        let views = items
            .iter()
            .map(|item| {
                let product = index.product(item.id.as_str());
                let unit = product.map_or(Decimal::ZERO, |p| p.price);
                CartItemView {
                    id: item.id.to_string(),
                    name: product
                        .and_then(|p| p.name.clone())
                        .unwrap_or_else(|| format!("Product {}", item.id)),
                    image: product
                        .and_then(|p| p.image.clone())
                        .unwrap_or_else(|| "/assets/images/insert_image.jpg".to_string()),
                    qty: item.qty,
                    qty_dec: item.qty.saturating_sub(1).max(1),
                    qty_inc: item.qty.saturating_add(1),
                    unit_price: format_price(unit),
                    line_total: format_price(unit * Decimal::from(item.qty)),
                }
            })
            .collect();

        Self {
            items: views,
            item_count: items.iter().map(|i| u64::from(i.qty)).sum(),
            subtotal: format_price(subtotal),
            discount: format_price(total_discount),
            total: format_price(discount::net_total(subtotal, total_discount)),
        }
    }
}

/// Add to cart form data. Quantity arrives as raw text so invalid input can
/// be defaulted instead of rejected.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    pub quantity: Option<String>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: String,
    pub quantity: String,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u64,
}

/// Checkout stub page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate;

/// Render the cart items fragment from fresh authoritative state.
async fn fresh_cart_items(state: &AppState) -> CartItemsTemplate {
    let items = state.cart().list();
    let index = state.catalog().load().await;
    CartItemsTemplate {
        cart: CartView::build(&items, &index),
    }
}

/// Display the cart page.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> impl IntoResponse {
    let items = state.cart().list();
    let index = state.catalog().load().await;

    CartShowTemplate {
        cart: CartView::build(&items, &index),
    }
}

/// Add an item to the cart (HTMX).
///
/// Returns the count badge fragment with an HTMX trigger so the cart page,
/// if open, refreshes its items.
#[instrument(skip(state))]
pub async fn add(State(state): State<AppState>, Form(form): Form<AddToCartForm>) -> Response {
    let qty = form
        .quantity
        .as_deref()
        .and_then(|raw| raw.trim().parse::<i64>().ok());
    state.cart().add(&form.product_id, qty);

    let count = state.cart().total_quantity();
    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartCountTemplate { count },
    )
        .into_response()
}

/// Update a cart line's quantity (HTMX).
#[instrument(skip(state))]
pub async fn update(State(state): State<AppState>, Form(form): Form<UpdateCartForm>) -> Response {
    // Unparseable input clamps to 1, like the quantity input on the page.
    let qty = form.quantity.trim().parse::<i64>().unwrap_or(1);
    state.cart().update(&form.product_id, qty);

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        fresh_cart_items(&state).await,
    )
        .into_response()
}

/// Remove a line from the cart (HTMX).
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Form(form): Form<RemoveFromCartForm>,
) -> Response {
    state.cart().remove(&form.product_id);

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        fresh_cart_items(&state).await,
    )
        .into_response()
}

/// Empty the cart (HTMX).
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Response {
    state.cart().clear();

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        fresh_cart_items(&state).await,
    )
        .into_response()
}

/// Cart count badge (HTMX).
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> impl IntoResponse {
    CartCountTemplate {
        count: state.cart().total_quantity(),
    }
}

/// Checkout stub page. Checkout is deliberately not implemented.
#[instrument]
pub async fn checkout() -> impl IntoResponse {
    CheckoutTemplate
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogDocument;

    fn index(json: &str) -> CatalogIndex {
        let doc: CatalogDocument = serde_json::from_str(json).expect("catalog parses");
        CatalogIndex::from_document(&doc)
    }

    #[test]
    fn test_build_totals_and_lines() {
        let index = index(
            r#"{"categories": [{"id": "c1", "products": [
                {"id": "p1", "name": "Wax", "price": 10.0}]}]}"#,
        );
        let items = vec![LineItem::new("p1", 3)];

        let view = CartView::build(&items, &index);
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].name, "Wax");
        assert_eq!(view.items[0].unit_price, "£10.00");
        assert_eq!(view.items[0].line_total, "£30.00");
        assert_eq!(view.subtotal, "£30.00");
        assert_eq!(view.discount, "£0.00");
        assert_eq!(view.total, "£30.00");
        assert_eq!(view.item_count, 3);
    }

    #[test]
    fn test_build_applies_discounts() {
        let index = index(
            r#"{"categories": [{"id": "c1", "products": [
                {"id": "p1", "price": 5.0, "deals": ["d1"]},
                {"id": "p2", "price": 5.0, "deals": ["d1"]}]}],
                "deals": [{"id": "d1", "type": "percentage", "requiredQty": 2, "percentOff": 10}]}"#,
        );
        let items = vec![LineItem::new("p1", 1), LineItem::new("p2", 1)];

        let view = CartView::build(&items, &index);
        assert_eq!(view.subtotal, "£10.00");
        assert_eq!(view.discount, "£1.00");
        assert_eq!(view.total, "£9.00");
    }

    #[test]
    fn test_build_floors_displayed_total_at_zero() {
        // promotions overshooting the subtotal never show a negative total
        let index = index(
            r#"{"categories": [{"id": "c1", "products": [
                {"id": "p1", "price": 1.0, "deals": ["d1", "d2"]}]}],
                "deals": [
                    {"id": "d1", "type": "percentage", "requiredQty": 1, "percent": 100},
                    {"id": "d2", "type": "percentage", "requiredQty": 1, "percent": 100}]}"#,
        );
        let items = vec![LineItem::new("p1", 1)];

        let view = CartView::build(&items, &index);
        assert_eq!(view.discount, "£2.00");
        assert_eq!(view.total, "£0.00");
    }

    #[test]
    fn test_build_with_unknown_product() {
        let view = CartView::build(&[LineItem::new("ghost", 2)], &CatalogIndex::default());
        assert_eq!(view.items[0].name, "Product ghost");
        assert_eq!(view.items[0].unit_price, "£0.00");
        assert_eq!(view.total, "£0.00");
        assert_eq!(view.item_count, 2);
    }

    #[test]
    fn test_qty_button_targets() {
        let index = CatalogIndex::default();
        let view = CartView::build(&[LineItem::new("p1", 1)], &index);
        // decreasing below 1 re-requests 1, like the page's qty input
        assert_eq!(view.items[0].qty_dec, 1);
        assert_eq!(view.items[0].qty_inc, 2);
    }

    #[test]
    fn test_empty_view() {
        let view = CartView::empty();
        assert!(view.items.is_empty());
        assert_eq!(view.total, "£0.00");
        assert_eq!(view.item_count, 0);
    }
}
