//! Create Category Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::extract::JsonBody,
    prelude::*,
};

use crate::{
    catalog::{CategoryResponse, CreateCategoryRequest, into_status_error},
    extensions::*,
    state::State,
};

/// Create Category Handler
#[endpoint(
    tags("admin"),
    summary = "Create Category",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Category created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid category or unknown parent"),
        (status_code = StatusCode::CONFLICT, description = "Slug already in use"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateCategoryRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CategoryResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let category = state
        .app
        .catalog
        .create_category(json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/api/categories/{}", category.slug), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(category.into()))
}
