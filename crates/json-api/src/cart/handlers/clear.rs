//! Clear Cart Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    cart::into_status_error,
    extensions::*,
    observability::{CartOperation, record_cart_operation},
    state::State,
};

/// Clear Cart Handler
///
/// Deletes every line of the signed-in user's cart.
#[endpoint(
    tags("cart"),
    summary = "Clear Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Cart cleared"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    state
        .app
        .carts
        .clear_cart(principal)
        .await
        .map_err(into_status_error)?;

    record_cart_operation(CartOperation::Clear);

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use testresult::TestResult;

    use crate::{
        cart::remove,
        test_helpers::{CUSTOMER, Mocks, customer_service},
    };

    use super::*;

    #[tokio::test]
    async fn test_clear_is_routed_before_item_ids() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .carts
            .expect_clear_cart()
            .once()
            .withf(|principal| *principal == CUSTOMER)
            .return_once(|_| Ok(2));

        mocks.carts.expect_remove_item().never();

        let router = Router::with_path("cart")
            .push(Router::with_path("clear").delete(handler))
            .push(Router::with_path("{id}").delete(remove::handler));

        let res = TestClient::delete("http://example.com/cart/clear")
            .send(&customer_service(mocks, router))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NO_CONTENT));

        Ok(())
    }
}
