//! Create Product Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::extract::JsonBody,
    prelude::*,
};

use crate::{
    catalog::{CreateProductRequest, ProductResponse, into_status_error},
    extensions::*,
    state::State,
};

/// Create Product Handler
///
/// The slug is derived from the name when omitted.
#[endpoint(
    tags("admin"),
    summary = "Create Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Product created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid product"),
        (status_code = StatusCode::CONFLICT, description = "Slug already in use"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateProductRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<ProductResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let product = state
        .app
        .catalog
        .create_product(json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/api/products/{}", product.slug), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(product.into()))
}
