//! Admin Customers Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{
    admin::{CustomerResponse, into_status_error},
    extensions::*,
    pagination::{PaginationResponse, page_request},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CustomersResponse {
    pub customers: Vec<CustomerResponse>,
    pub pagination: PaginationResponse,
}

/// Admin Customers Handler
///
/// Customer accounts, newest first, with order count and amount spent.
#[endpoint(
    tags("admin"),
    summary = "List Customers",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    page: QueryParam<u32, false>,
    per_page: QueryParam<u32, false>,
    depot: &mut Depot,
) -> Result<Json<CustomersResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let page = state
        .app
        .admin
        .list_customers(principal, page_request(page, per_page))
        .await
        .map_err(into_status_error)?;

    Ok(Json(CustomersResponse {
        customers: page.customers.into_iter().map(Into::into).collect(),
        pagination: page.pagination.into(),
    }))
}
