//! Admin Errors

use salvo::http::StatusError;
use tracing::error;

use storefront_app::domain::admin::AdminServiceError;

pub(crate) fn into_status_error(error: AdminServiceError) -> StatusError {
    match error {
        AdminServiceError::Forbidden => StatusError::forbidden().brief("Admin access required"),
        AdminServiceError::Sql(source) => {
            error!("admin storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
