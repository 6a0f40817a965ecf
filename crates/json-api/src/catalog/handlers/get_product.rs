//! Get Product Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};

use crate::{
    catalog::{ProductDetailResponse, into_status_error},
    extensions::*,
    state::State,
};

/// Get Product Handler
///
/// Returns an active product by slug with its review summary.
#[endpoint(
    tags("catalog"),
    summary = "Get Product",
    responses(
        (status_code = StatusCode::OK, description = "Product detail"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
    ),
)]
pub(crate) async fn handler(
    slug: PathParam<String>,
    depot: &mut Depot,
) -> Result<Json<ProductDetailResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let detail = state
        .app
        .catalog
        .get_product(&slug.into_inner())
        .await
        .map_err(into_status_error)?;

    Ok(Json(detail.into()))
}
