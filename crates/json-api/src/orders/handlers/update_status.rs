//! Update Order Status Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::orders::models::OrderStatusUpdate;
use storefront_core::orders::{OrderStatus, PaymentStatus};

use crate::{
    extensions::*,
    orders::{OrderResponse, into_status_error},
    state::State,
};

/// Update Order Status Request
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub(crate) struct UpdateOrderStatusRequest {
    /// `pending`, `processing`, `shipped`, `delivered` or `cancelled`
    pub status: Option<String>,

    /// `pending`, `paid`, `failed` or `refunded`
    pub payment_status: Option<String>,
}

impl UpdateOrderStatusRequest {
    fn into_update(self) -> Result<OrderStatusUpdate, StatusError> {
        let status = self
            .status
            .map(|status| status.parse::<OrderStatus>())
            .transpose()
            .or_400("unknown order status")?;

        let payment_status = self
            .payment_status
            .map(|status| status.parse::<PaymentStatus>())
            .transpose()
            .or_400("unknown payment status")?;

        Ok(OrderStatusUpdate {
            status,
            payment_status,
        })
    }
}

/// Update Order Status Handler
///
/// Moves an order through its lifecycle. Cancelling returns the ordered stock.
#[endpoint(
    tags("admin"),
    summary = "Update Order Status",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Unknown or missing status"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::CONFLICT, description = "Transition not allowed"),
    ),
)]
pub(crate) async fn handler(
    id: PathParam<Uuid>,
    json: JsonBody<UpdateOrderStatusRequest>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;
    let update = json.into_inner().into_update()?;

    let order = state
        .app
        .orders
        .update_order_status(principal, id.into_inner().into(), update)
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use storefront_app::domain::orders::{OrdersServiceError, models::OrderUuid};
    use storefront_core::orders::OrderStateError;

    use crate::test_helpers::{ADMIN, Mocks, admin_service, make_order};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        admin_service(mocks, Router::with_path("admin/orders/{id}").patch(handler))
    }

    #[tokio::test]
    async fn test_ships_order() -> TestResult {
        let uuid = OrderUuid::new();
        let mut mocks = Mocks::default();

        mocks
            .orders
            .expect_update_order_status()
            .once()
            .withf(move |principal, order, update| {
                *principal == ADMIN
                    && *order == uuid
                    && *update
                        == OrderStatusUpdate {
                            status: Some(OrderStatus::Shipped),
                            payment_status: None,
                        }
            })
            .return_once(move |_, _, _| Ok(make_order(uuid, OrderStatus::Shipped)));

        let order: OrderResponse = TestClient::patch(format!("http://example.com/admin/orders/{uuid}"))
            .json(&json!({ "status": "shipped" }))
            .send(&make_service(mocks))
            .await
            .take_json()
            .await?;

        assert_eq!(order.status, "shipped");

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_payment_status_returns_400() -> TestResult {
        let mut mocks = Mocks::default();

        mocks.orders.expect_update_order_status().never();

        let res = TestClient::patch(format!("http://example.com/admin/orders/{}", OrderUuid::new()))
            .json(&json!({ "payment_status": "maybe" }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_forbidden_transition_returns_409() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .orders
            .expect_update_order_status()
            .once()
            .return_once(|_, _, _| {
                Err(OrdersServiceError::InvalidTransition(
                    OrderStateError::InvalidStatusTransition {
                        from: OrderStatus::Delivered,
                        to: OrderStatus::Pending,
                    },
                ))
            });

        let res = TestClient::patch(format!("http://example.com/admin/orders/{}", OrderUuid::new()))
            .json(&json!({ "status": "pending" }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }
}
