//! Get Address Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    addresses::{AddressEnvelope, into_status_error},
    extensions::*,
    state::State,
};

/// Get Address Handler
#[endpoint(
    tags("addresses"),
    summary = "Get Address",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Address"),
        (status_code = StatusCode::NOT_FOUND, description = "Address not found"),
    ),
)]
pub(crate) async fn handler(
    id: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<AddressEnvelope>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let address = state
        .app
        .addresses
        .get_address(principal, id.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(address.into()))
}
