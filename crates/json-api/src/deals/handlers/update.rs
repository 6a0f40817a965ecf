//! Replace Deal Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use uuid::Uuid;

use crate::{
    deals::{DealEnvelope, DealRequest, into_status_error},
    extensions::*,
    state::State,
};

/// Replace Deal Handler
///
/// Replaces the whole definition, including its product and category scope.
#[endpoint(
    tags("admin"),
    summary = "Update Deal",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Deal updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid deal"),
        (status_code = StatusCode::NOT_FOUND, description = "Deal not found"),
    ),
)]
pub(crate) async fn handler(
    id: PathParam<Uuid>,
    json: JsonBody<DealRequest>,
    depot: &mut Depot,
) -> Result<Json<DealEnvelope>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let deal = json.into_inner().into_new_deal()?;

    let deal = state
        .app
        .deals
        .update_deal(id.into_inner().into(), deal)
        .await
        .map_err(into_status_error)?;

    Ok(Json(deal.into()))
}
