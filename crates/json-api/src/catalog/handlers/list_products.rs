//! List Products Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use storefront_app::domain::catalog::models::{ProductQuery, ProductSort};

use crate::{
    catalog::{ProductResponse, into_status_error},
    extensions::*,
    pagination::{PaginationResponse, page_request},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductsResponse {
    pub products: Vec<ProductResponse>,
    pub pagination: PaginationResponse,
}

/// Parse the optional `sort` query parameter.
pub(crate) fn product_sort(sort: QueryParam<String, false>) -> Result<ProductSort, StatusError> {
    sort.into_inner()
        .map(|sort| sort.parse::<ProductSort>())
        .transpose()
        .or_400("could not parse \"sort\" query parameter")
        .map(Option::unwrap_or_default)
}

/// List Products Handler
///
/// Returns active products, filtered, sorted and paginated.
#[endpoint(
    tags("catalog"),
    summary = "List Products",
    responses(
        (status_code = StatusCode::OK, description = "One page of products"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid query parameter"),
    ),
)]
pub(crate) async fn handler(
    page: QueryParam<u32, false>,
    per_page: QueryParam<u32, false>,
    category: QueryParam<String, false>,
    search: QueryParam<String, false>,
    min_price: QueryParam<u64, false>,
    max_price: QueryParam<u64, false>,
    featured: QueryParam<bool, false>,
    sort: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<ProductsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let query = ProductQuery {
        page: page_request(page, per_page),
        category: category.into_inner(),
        search: search.into_inner(),
        min_price: min_price.into_inner(),
        max_price: max_price.into_inner(),
        featured: featured.into_inner(),
        sort: product_sort(sort)?,
        include_inactive: false,
    };

    let page = state
        .app
        .catalog
        .list_products(query)
        .await
        .map_err(into_status_error)?;

    Ok(Json(ProductsResponse {
        products: page.products.into_iter().map(Into::into).collect(),
        pagination: page.pagination.into(),
    }))
}
