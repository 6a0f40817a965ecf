//! Address Errors

use salvo::http::StatusError;
use tracing::error;

use storefront_app::domain::addresses::AddressesServiceError;

pub(crate) fn into_status_error(error: AddressesServiceError) -> StatusError {
    match error {
        AddressesServiceError::NotFound => StatusError::not_found(),
        AddressesServiceError::Conflict => {
            StatusError::conflict().brief("Another address is already the default")
        }
        AddressesServiceError::MissingField(field) => StatusError::bad_request()
            .brief(format!("{field} is required"))
            .detail(field),
        AddressesServiceError::MissingRequiredData | AddressesServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid address")
        }
        AddressesServiceError::Sql(source) => {
            error!("addresses storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
