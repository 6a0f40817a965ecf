//! Get Cart Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    cart::{CartItemResponse, into_status_error},
    extensions::*,
    state::State,
};

/// Cart Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    pub items: Vec<CartItemResponse>,

    /// Sum of line totals at live prices
    pub subtotal: u64,

    /// Units across all lines
    pub item_count: u64,
}

/// Get Cart Handler
///
/// Returns the signed-in user's cart with live product data.
#[endpoint(
    tags("cart"),
    summary = "Get Cart",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let cart = state
        .app
        .carts
        .get_cart(principal)
        .await
        .map_err(into_status_error)?;

    let subtotal = cart.subtotal().or_500("failed to total cart")?;
    let item_count = cart.item_count();

    Ok(Json(CartResponse {
        items: cart.items.into_iter().map(Into::into).collect(),
        subtotal,
        item_count,
    }))
}
