//! Admin Order Index Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};

use storefront_app::domain::orders::models::OrderQuery;
use storefront_core::orders::OrderStatus;

use crate::{
    extensions::*,
    orders::{into_status_error, index::OrdersResponse},
    pagination::page_request,
    state::State,
};

/// Admin Order Index Handler
///
/// Lists every order, optionally filtered by fulfilment status.
#[endpoint(
    tags("admin"),
    summary = "List All Orders",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Orders"),
        (status_code = StatusCode::BAD_REQUEST, description = "Unknown status filter"),
        (status_code = StatusCode::FORBIDDEN, description = "Admin access required"),
    ),
)]
pub(crate) async fn handler(
    page: QueryParam<u32, false>,
    per_page: QueryParam<u32, false>,
    status: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<OrdersResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let status = status
        .into_inner()
        .map(|status| status.parse::<OrderStatus>())
        .transpose()
        .or_400("unknown order status")?;

    let query = OrderQuery {
        page: page_request(page, per_page),
        status,
    };

    let page = state
        .app
        .orders
        .list_all_orders(principal, query)
        .await
        .map_err(into_status_error)?;

    Ok(Json(OrdersResponse {
        orders: page.orders.into_iter().map(Into::into).collect(),
        pagination: page.pagination.into(),
    }))
}
