//! Place Order Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::orders::models::{NewOrder, NewOrderLine};
use storefront_core::orders::PaymentMethod;

use crate::{
    extensions::*,
    observability::record_order_placed,
    orders::{OrderDetailResponse, into_status_error},
    state::State,
};

/// One submitted order line
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderLineRequest {
    pub product_id: Uuid,

    /// Unit price the shopper was shown; must equal the live price
    pub price: u64,

    pub quantity: u32,

    /// Display name at submission time; the stored name comes from the product
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub images: Vec<String>,
}

/// Place Order Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PlaceOrderRequest {
    pub items: Vec<OrderLineRequest>,
    pub shipping_address_id: Uuid,

    /// Defaults to the shipping address
    #[serde(default)]
    pub billing_address_id: Option<Uuid>,

    /// `cod`, `bank_transfer` or `card`
    pub payment_method: String,

    #[serde(default)]
    pub notes: Option<String>,
}

impl PlaceOrderRequest {
    fn into_new_order(self) -> Result<NewOrder, StatusError> {
        let payment_method = self
            .payment_method
            .parse::<PaymentMethod>()
            .or_400("unknown payment method")?;

        Ok(NewOrder {
            items: self
                .items
                .into_iter()
                .map(|line| NewOrderLine {
                    product_uuid: line.product_id.into(),
                    price: line.price,
                    quantity: line.quantity,
                })
                .collect(),
            shipping_address_uuid: self.shipping_address_id.into(),
            billing_address_uuid: self.billing_address_id.map(Into::into),
            payment_method,
            notes: self.notes,
        })
    }
}

/// Place Order Handler
///
/// Re-validates prices and stock, computes totals, decrements stock and clears the
/// persisted cart in one transaction.
#[endpoint(
    tags("orders"),
    summary = "Place Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Order placed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid order"),
        (status_code = StatusCode::CONFLICT, description = "Price, stock or availability changed"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<PlaceOrderRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderDetailResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;
    let order = json.into_inner().into_new_order()?;

    let detail = state
        .app
        .orders
        .place_order(principal, order)
        .await
        .map_err(into_status_error)?;

    record_order_placed(detail.order.payment_method.as_str());

    res.add_header(LOCATION, format!("/api/orders/{}", detail.order.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(detail.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use storefront_app::domain::{
        addresses::models::AddressUuid,
        catalog::models::ProductUuid,
        orders::{OrdersServiceError, models::OrderUuid},
    };
    use storefront_core::orders::OrderStatus;

    use crate::{
        orders::tests::make_detail,
        test_helpers::{CUSTOMER, Mocks, customer_service},
    };

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        customer_service(mocks, Router::with_path("orders").post(handler))
    }

    #[tokio::test]
    async fn test_place_order_returns_server_totals() -> TestResult {
        let order = OrderUuid::new();
        let kettle = ProductUuid::new();
        let teapot = ProductUuid::new();
        let address = AddressUuid::new();
        let mut mocks = Mocks::default();

        mocks
            .orders
            .expect_place_order()
            .once()
            .withf(move |principal, new| {
                *principal == CUSTOMER
                    && *new
                        == NewOrder {
                            items: vec![
                                NewOrderLine {
                                    product_uuid: kettle,
                                    price: 100_000,
                                    quantity: 2,
                                },
                                NewOrderLine {
                                    product_uuid: teapot,
                                    price: 50_000,
                                    quantity: 1,
                                },
                            ],
                            shipping_address_uuid: address,
                            billing_address_uuid: None,
                            payment_method: PaymentMethod::Cod,
                            notes: None,
                        }
            })
            .return_once(move |_, _| Ok(make_detail(order, OrderStatus::Pending)));

        let mut res = TestClient::post("http://example.com/orders")
            .json(&json!({
                "items": [
                    { "product_id": kettle.into_uuid(), "name": "Kettle", "price": 100_000, "quantity": 2 },
                    { "product_id": teapot.into_uuid(), "name": "Teapot", "price": 50_000, "quantity": 1 },
                ],
                "shipping_address_id": address.into_uuid(),
                "payment_method": "cod",
            }))
            .send(&make_service(mocks))
            .await;

        let body: OrderDetailResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(body.order.subtotal, 250_000);
        assert_eq!(body.order.tax, 25_000);
        assert_eq!(body.order.shipping, 30_000);
        assert_eq!(body.order.total, 305_000);
        assert_eq!(body.items.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_payment_method_returns_400() -> TestResult {
        let mut mocks = Mocks::default();

        mocks.orders.expect_place_order().never();

        let res = TestClient::post("http://example.com/orders")
            .json(&json!({
                "items": [],
                "shipping_address_id": AddressUuid::new().into_uuid(),
                "payment_method": "barter",
            }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_stale_price_returns_409() -> TestResult {
        let product = ProductUuid::new();
        let mut mocks = Mocks::default();

        mocks.orders.expect_place_order().once().return_once(move |_, _| {
            Err(OrdersServiceError::PriceChanged {
                product,
                submitted: 1_000,
                current: 1_200,
            })
        });

        let res = TestClient::post("http://example.com/orders")
            .json(&json!({
                "items": [{ "product_id": product.into_uuid(), "price": 1_000, "quantity": 1 }],
                "shipping_address_id": AddressUuid::new().into_uuid(),
                "payment_method": "card",
            }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }
}
