//! Update Cart Item Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    cart::{CartItemEnvelope, into_status_error},
    extensions::*,
    observability::{CartOperation, record_cart_operation},
    state::State,
};

/// Update Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateCartItemRequest {
    /// Replaces the line quantity
    pub quantity: u32,
}

/// Update Cart Item Handler
#[endpoint(
    tags("cart"),
    summary = "Set Cart Item Quantity",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Cart line updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Quantity below 1"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart line not found"),
        (status_code = StatusCode::CONFLICT, description = "Not enough stock"),
    ),
)]
pub(crate) async fn handler(
    id: PathParam<Uuid>,
    json: JsonBody<UpdateCartItemRequest>,
    depot: &mut Depot,
) -> Result<Json<CartItemEnvelope>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let item = state
        .app
        .carts
        .update_quantity(principal, id.into_inner().into(), json.into_inner().quantity)
        .await
        .map_err(into_status_error)?;

    record_cart_operation(CartOperation::SetQuantity);

    Ok(Json(item.into()))
}
