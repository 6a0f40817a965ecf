//! Remove Cart Item Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    cart::into_status_error,
    extensions::*,
    observability::{CartOperation, record_cart_operation},
    state::State,
};

/// Remove Cart Item Handler
#[endpoint(
    tags("cart"),
    summary = "Remove Cart Item",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Cart line removed"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart line not found"),
    ),
)]
pub(crate) async fn handler(
    id: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    state
        .app
        .carts
        .remove_item(principal, id.into_inner().into())
        .await
        .map_err(into_status_error)?;

    record_cart_operation(CartOperation::Remove);

    Ok(StatusCode::NO_CONTENT)
}
