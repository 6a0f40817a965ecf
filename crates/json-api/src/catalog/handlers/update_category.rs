//! Update Category Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use uuid::Uuid;

use crate::{
    catalog::{CategoryResponse, UpdateCategoryRequest, into_status_error},
    extensions::*,
    state::State,
};

/// Update Category Handler
///
/// Absent fields keep their current value. A category cannot be its own parent.
#[endpoint(
    tags("admin"),
    summary = "Update Category",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Category updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Category not found"),
        (status_code = StatusCode::CONFLICT, description = "Slug already in use"),
    ),
)]
pub(crate) async fn handler(
    id: PathParam<Uuid>,
    json: JsonBody<UpdateCategoryRequest>,
    depot: &mut Depot,
) -> Result<Json<CategoryResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let category = state
        .app
        .catalog
        .update_category(id.into_inner().into(), json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(category.into()))
}
