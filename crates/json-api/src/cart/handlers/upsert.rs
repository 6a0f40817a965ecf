//! Add To Cart Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::carts::models::NewCartItem;

use crate::{
    cart::{CartItemEnvelope, into_status_error},
    extensions::*,
    observability::{CartOperation, record_cart_operation},
    state::State,
};

/// Add To Cart Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddToCartRequest {
    pub product_id: Uuid,

    /// Added to the existing quantity when the product is already in the cart
    pub quantity: u32,
}

impl From<AddToCartRequest> for NewCartItem {
    fn from(request: AddToCartRequest) -> Self {
        NewCartItem {
            product_uuid: request.product_id.into(),
            quantity: request.quantity,
        }
    }
}

/// Add To Cart Handler
///
/// Upserts a cart line, merging quantities. The merged quantity may not exceed stock.
#[endpoint(
    tags("cart"),
    summary = "Add To Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Cart line after merge"),
        (status_code = StatusCode::BAD_REQUEST, description = "Quantity below 1"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not available"),
        (status_code = StatusCode::CONFLICT, description = "Not enough stock"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<AddToCartRequest>,
    depot: &mut Depot,
) -> Result<Json<CartItemEnvelope>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let item = state
        .app
        .carts
        .add_item(principal, json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    record_cart_operation(CartOperation::Add);

    Ok(Json(item.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use storefront_app::domain::{
        carts::{CartsServiceError, models::CartItemUuid},
        catalog::models::ProductUuid,
    };

    use crate::test_helpers::{CUSTOMER, Mocks, customer_service};

    use super::{super::tests::make_item, *};

    fn make_service(mocks: Mocks) -> Service {
        customer_service(mocks, Router::with_path("cart").post(handler))
    }

    #[tokio::test]
    async fn test_add_returns_merged_line() -> TestResult {
        let product = ProductUuid::new();
        let item = CartItemUuid::new();
        let mut mocks = Mocks::default();

        mocks
            .carts
            .expect_add_item()
            .once()
            .withf(move |principal, new| {
                *principal == CUSTOMER
                    && *new
                        == NewCartItem {
                            product_uuid: product,
                            quantity: 2,
                        }
            })
            .return_once(move |_, _| Ok(make_item(item, product, 1_200, 5)));

        let body: CartItemEnvelope = TestClient::post("http://example.com/cart")
            .json(&json!({ "product_id": product.into_uuid(), "quantity": 2 }))
            .send(&make_service(mocks))
            .await
            .take_json()
            .await?;

        assert_eq!(body.item.id, item.into_uuid());
        assert_eq!(body.item.quantity, 5, "quantities merge with the existing line");

        Ok(())
    }

    #[tokio::test]
    async fn test_exceeding_stock_returns_409() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .carts
            .expect_add_item()
            .once()
            .return_once(|_, _| Err(CartsServiceError::InsufficientStock { available: 3 }));

        let res = TestClient::post("http://example.com/cart")
            .json(&json!({ "product_id": ProductUuid::new().into_uuid(), "quantity": 4 }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }

    #[tokio::test]
    async fn test_unavailable_product_returns_404() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .carts
            .expect_add_item()
            .once()
            .return_once(|_, _| Err(CartsServiceError::ProductUnavailable));

        let res = TestClient::post("http://example.com/cart")
            .json(&json!({ "product_id": ProductUuid::new().into_uuid(), "quantity": 1 }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
