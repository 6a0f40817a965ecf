//! Delete Review Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{extensions::*, reviews::into_status_error, state::State};

/// Delete Review Handler
///
/// Reviews of other users are reported as not found.
#[endpoint(
    tags("reviews"),
    summary = "Delete Review",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Review deleted"),
        (status_code = StatusCode::NOT_FOUND, description = "Review not found"),
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
        .reviews
        .delete_review(principal, id.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::NO_CONTENT)
}
