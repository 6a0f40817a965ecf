//! Order Index Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{
    extensions::*,
    orders::{OrderResponse, into_status_error},
    pagination::{PaginationResponse, page_request},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrdersResponse {
    pub orders: Vec<OrderResponse>,
    pub pagination: PaginationResponse,
}

/// Order Index Handler
///
/// Returns the signed-in user's orders, newest first.
#[endpoint(
    tags("orders"),
    summary = "List Orders",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    page: QueryParam<u32, false>,
    per_page: QueryParam<u32, false>,
    depot: &mut Depot,
) -> Result<Json<OrdersResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let page = state
        .app
        .orders
        .list_orders(principal, page_request(page, per_page))
        .await
        .map_err(into_status_error)?;

    Ok(Json(OrdersResponse {
        orders: page.orders.into_iter().map(Into::into).collect(),
        pagination: page.pagination.into(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use storefront_app::domain::orders::models::{OrderPage, OrderUuid};
    use storefront_core::{orders::OrderStatus, pagination::PageRequest};

    use crate::test_helpers::{CUSTOMER, Mocks, customer_service, make_order};

    use super::*;

    #[tokio::test]
    async fn test_lists_own_orders() -> TestResult {
        let uuid = OrderUuid::new();
        let mut mocks = Mocks::default();

        mocks
            .orders
            .expect_list_orders()
            .once()
            .withf(|principal, page| *principal == CUSTOMER && *page == PageRequest::default())
            .return_once(move |_, page| {
                Ok(OrderPage {
                    orders: vec![make_order(uuid, OrderStatus::Pending)],
                    pagination: page.paginate(1),
                })
            });

        let service = customer_service(mocks, Router::with_path("orders").get(handler));

        let response: OrdersResponse = TestClient::get("http://example.com/orders")
            .send(&service)
            .await
            .take_json()
            .await?;

        assert_eq!(response.orders.len(), 1);
        assert_eq!(response.orders[0].id, uuid.into_uuid());
        assert_eq!(response.orders[0].status, "pending");
        assert_eq!(response.pagination.total, 1);

        Ok(())
    }
}
