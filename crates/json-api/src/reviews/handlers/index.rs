//! Review Index Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{PathParam, QueryParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{
    extensions::*,
    pagination::{PaginationResponse, page_request},
    reviews::{ReviewResponse, into_status_error},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ReviewsResponse {
    pub reviews: Vec<ReviewResponse>,
    pub pagination: PaginationResponse,
}

/// Review Index Handler
///
/// Returns a product's reviews, newest first.
#[endpoint(
    tags("reviews"),
    summary = "List Product Reviews",
    responses(
        (status_code = StatusCode::OK, description = "One page of reviews"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
    ),
)]
pub(crate) async fn handler(
    slug: PathParam<String>,
    page: QueryParam<u32, false>,
    per_page: QueryParam<u32, false>,
    depot: &mut Depot,
) -> Result<Json<ReviewsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let page = state
        .app
        .reviews
        .list_reviews(&slug.into_inner(), page_request(page, per_page))
        .await
        .map_err(into_status_error)?;

    Ok(Json(ReviewsResponse {
        reviews: page.reviews.into_iter().map(Into::into).collect(),
        pagination: page.pagination.into(),
    }))
}
