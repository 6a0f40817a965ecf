//! Update Address Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use uuid::Uuid;

use crate::{
    addresses::{AddressEnvelope, UpdateAddressRequest, into_status_error},
    extensions::*,
    state::State,
};

/// Update Address Handler
///
/// Partial update. Setting `is_default` to `true` unsets every other default.
#[endpoint(
    tags("addresses"),
    summary = "Update Address",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Address updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Blank required field"),
        (status_code = StatusCode::NOT_FOUND, description = "Address not found"),
    ),
)]
pub(crate) async fn handler(
    id: PathParam<Uuid>,
    json: JsonBody<UpdateAddressRequest>,
    depot: &mut Depot,
) -> Result<Json<AddressEnvelope>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let address = state
        .app
        .addresses
        .update_address(principal, id.into_inner().into(), json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(address.into()))
}
