//! Catalog Errors

use salvo::http::StatusError;
use tracing::error;

use storefront_app::domain::catalog::CatalogServiceError;

pub(crate) fn into_status_error(error: CatalogServiceError) -> StatusError {
    match error {
        CatalogServiceError::AlreadyExists => StatusError::conflict().brief("Slug already in use"),
        CatalogServiceError::NotFound => StatusError::not_found(),
        CatalogServiceError::InvalidReference => {
            StatusError::bad_request().brief("Category not found")
        }
        CatalogServiceError::MissingRequiredData | CatalogServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid catalog payload")
        }
        CatalogServiceError::Sql(source) => {
            error!("catalog storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
