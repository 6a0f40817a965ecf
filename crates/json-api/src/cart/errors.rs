//! Cart Errors

use salvo::http::StatusError;
use tracing::error;

use storefront_app::domain::carts::CartsServiceError;

pub(crate) fn into_status_error(error: CartsServiceError) -> StatusError {
    match error {
        CartsServiceError::NotFound => StatusError::not_found().brief("Cart item not found"),
        CartsServiceError::ProductUnavailable | CartsServiceError::InvalidReference => {
            StatusError::not_found().brief("Product not found or not available")
        }
        CartsServiceError::InsufficientStock { available } => {
            StatusError::conflict().brief(format!("Only {available} units in stock"))
        }
        CartsServiceError::InvalidQuantity => StatusError::bad_request()
            .brief("Quantity must be at least 1")
            .detail("quantity"),
        CartsServiceError::InvalidData => StatusError::bad_request().brief("Invalid cart item"),
        CartsServiceError::Sql(source) => {
            error!("cart storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
