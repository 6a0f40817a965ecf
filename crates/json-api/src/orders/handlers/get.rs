//! Get Order Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*,
    orders::{OrderDetailResponse, into_status_error},
    state::State,
};

/// Get Order Handler
///
/// Returns an order with its items and addresses. Orders of other users are not found.
#[endpoint(
    tags("orders"),
    summary = "Get Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order detail"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
    ),
)]
pub(crate) async fn handler(
    id: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrderDetailResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let detail = state
        .app
        .orders
        .get_order(principal, id.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(detail.into()))
}
