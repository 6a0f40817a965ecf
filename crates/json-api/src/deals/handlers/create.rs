//! Create Deal Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::extract::JsonBody,
    prelude::*,
};

use crate::{
    deals::{DealEnvelope, DealRequest, into_status_error},
    extensions::*,
    state::State,
};

/// Create Deal Handler
#[endpoint(
    tags("admin"),
    summary = "Create Deal",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Deal created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid deal"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<DealRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<DealEnvelope>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let deal = json.into_inner().into_new_deal()?;

    let deal = state
        .app
        .deals
        .create_deal(deal)
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/api/admin/deals/{}", deal.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(deal.into()))
}
