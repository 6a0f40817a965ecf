//! Delete Address Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{addresses::into_status_error, extensions::*, state::State};

/// Delete Address Handler
#[endpoint(
    tags("addresses"),
    summary = "Delete Address",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Address deleted"),
        (status_code = StatusCode::NOT_FOUND, description = "Address not found"),
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
        .addresses
        .delete_address(principal, id.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::NO_CONTENT)
}
