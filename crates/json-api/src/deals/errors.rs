//! Deal Errors

use salvo::http::StatusError;
use tracing::error;

use storefront_app::domain::deals::DealsServiceError;

pub(crate) fn into_status_error(error: DealsServiceError) -> StatusError {
    match error {
        DealsServiceError::NotFound => StatusError::not_found(),
        DealsServiceError::MissingTitle => StatusError::bad_request()
            .brief("title is required")
            .detail("title"),
        DealsServiceError::Invalid(source) => StatusError::bad_request().brief(source.to_string()),
        DealsServiceError::InvalidData => StatusError::bad_request().brief("Invalid deal"),
        DealsServiceError::Sql(source) => {
            error!("deals storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
