//! Get Category Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};

use crate::{
    catalog::{CategoryResponse, into_status_error},
    extensions::*,
    state::State,
};

/// Get Category Handler
#[endpoint(
    tags("catalog"),
    summary = "Get Category",
    responses(
        (status_code = StatusCode::OK, description = "Category"),
        (status_code = StatusCode::NOT_FOUND, description = "Category not found"),
    ),
)]
pub(crate) async fn handler(
    slug: PathParam<String>,
    depot: &mut Depot,
) -> Result<Json<CategoryResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let category = state
        .app
        .catalog
        .get_category(&slug.into_inner())
        .await
        .map_err(into_status_error)?;

    Ok(Json(category.into()))
}
