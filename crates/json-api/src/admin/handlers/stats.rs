//! Admin Stats Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    admin::{StatsResponse, into_status_error},
    extensions::*,
    state::State,
};

/// Admin Stats Handler
///
/// Dashboard figures: revenue, order counts by status, customers, active and
/// low-stock products, and the most recent orders.
#[endpoint(
    tags("admin"),
    summary = "Dashboard Stats",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Dashboard figures"),
        (status_code = StatusCode::FORBIDDEN, description = "Admin access required"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<StatsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let stats = state
        .app
        .admin
        .stats(principal)
        .await
        .map_err(into_status_error)?;

    Ok(Json(stats.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use storefront_app::domain::{
        admin::{
            AdminServiceError,
            models::{AdminStats, StatusCount, counts_for_every_status},
        },
        orders::models::OrderUuid,
    };
    use storefront_core::orders::OrderStatus;

    use crate::test_helpers::{ADMIN, Mocks, admin_service, customer_service, make_order};

    use super::*;

    #[tokio::test]
    async fn test_returns_dashboard_figures() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .admin
            .expect_stats()
            .once()
            .withf(|principal| *principal == ADMIN)
            .return_once(|_| {
                Ok(AdminStats {
                    total_revenue: 305_000,
                    order_count: 2,
                    orders_by_status: counts_for_every_status(&[StatusCount {
                        status: OrderStatus::Delivered,
                        count: 2,
                    }]),
                    customer_count: 1,
                    active_product_count: 8,
                    low_stock_threshold: 5,
                    low_stock_products: vec![],
                    recent_orders: vec![make_order(OrderUuid::new(), OrderStatus::Delivered)],
                })
            });

        let service = admin_service(mocks, Router::with_path("admin/stats").get(handler));

        let stats: StatsResponse = TestClient::get("http://example.com/admin/stats")
            .send(&service)
            .await
            .take_json()
            .await?;

        assert_eq!(stats.total_revenue, 305_000);
        assert_eq!(stats.orders_by_status.len(), OrderStatus::ALL.len());
        assert_eq!(stats.recent_orders.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_service_refusal_returns_403() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .admin
            .expect_stats()
            .once()
            .return_once(|_| Err(AdminServiceError::Forbidden));

        let service = customer_service(mocks, Router::with_path("admin/stats").get(handler));

        let res = TestClient::get("http://example.com/admin/stats")
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }
}
