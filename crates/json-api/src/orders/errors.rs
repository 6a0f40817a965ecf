//! Order Errors

use salvo::http::StatusError;
use tracing::error;

use storefront_app::domain::orders::OrdersServiceError;

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::NotFound => StatusError::not_found(),
        OrdersServiceError::EmptyOrder => StatusError::bad_request()
            .brief("An order needs at least one item")
            .detail("items"),
        OrdersServiceError::InvalidQuantity => StatusError::bad_request()
            .brief("Quantity must be at least 1")
            .detail("quantity"),
        OrdersServiceError::InvalidAddress => StatusError::bad_request()
            .brief("Address not found")
            .detail("shipping_address_id"),
        OrdersServiceError::EmptyUpdate => {
            StatusError::bad_request().brief("Nothing to update")
        }
        OrdersServiceError::Pricing(source) => StatusError::bad_request()
            .brief("Order amounts out of range")
            .detail(source.to_string()),
        OrdersServiceError::InvalidData => StatusError::bad_request().brief("Invalid order"),
        OrdersServiceError::ProductUnavailable { product } => {
            StatusError::conflict().brief(format!("Product {product} is no longer available"))
        }
        error @ (OrdersServiceError::PriceChanged { .. }
        | OrdersServiceError::InsufficientStock { .. }
        | OrdersServiceError::InvalidTransition(_)) => {
            StatusError::conflict().brief(error.to_string())
        }
        OrdersServiceError::AlreadyExists => {
            error!("order number collision");

            StatusError::internal_server_error()
        }
        OrdersServiceError::Sql(source) => {
            error!("orders storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;

    use storefront_app::domain::catalog::models::ProductUuid;
    use storefront_core::orders::{OrderStateError, OrderStatus};

    use super::*;

    #[test]
    fn revalidation_failures_are_conflicts() {
        let product = ProductUuid::new();

        for error in [
            OrdersServiceError::PriceChanged {
                product,
                submitted: 1_000,
                current: 1_200,
            },
            OrdersServiceError::InsufficientStock {
                product,
                available: 1,
            },
            OrdersServiceError::ProductUnavailable { product },
            OrdersServiceError::InvalidTransition(OrderStateError::InvalidStatusTransition {
                from: OrderStatus::Delivered,
                to: OrderStatus::Cancelled,
            }),
        ] {
            assert_eq!(into_status_error(error).code, StatusCode::CONFLICT);
        }
    }

    #[test]
    fn price_change_names_both_prices() {
        let error = into_status_error(OrdersServiceError::PriceChanged {
            product: ProductUuid::new(),
            submitted: 1_000,
            current: 1_200,
        });

        assert!(error.brief.contains("1000") && error.brief.contains("1200"));
    }
}
