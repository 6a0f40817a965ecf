//! Auth Errors

use salvo::http::StatusError;
use tracing::error;

use storefront_app::auth::{AuthServiceError, ValidationError};

/// A rejected input field, answered as 400 with the message as brief and the field as detail.
pub(crate) fn validation_error(error: ValidationError) -> StatusError {
    StatusError::bad_request()
        .brief(error.message)
        .detail(error.field)
}

pub(crate) fn into_status_error(error: AuthServiceError) -> StatusError {
    match error {
        AuthServiceError::NotFound => {
            StatusError::unauthorized().brief("Invalid or expired session")
        }
        AuthServiceError::InvalidCredentials => {
            StatusError::unauthorized().brief("Invalid email or password")
        }
        AuthServiceError::EmailTaken => {
            StatusError::conflict().brief("Email address is already registered")
        }
        AuthServiceError::InvalidVerificationCode => {
            StatusError::bad_request().brief("Invalid or expired verification code")
        }
        AuthServiceError::ProfileNotFound => StatusError::not_found().brief("Profile not found"),
        AuthServiceError::Validation(error) => validation_error(error),
        AuthServiceError::Password(source) => {
            error!("failed to process password: {source}");

            StatusError::internal_server_error()
        }
        AuthServiceError::Token(source) => {
            error!("failed to process session token: {source}");

            StatusError::internal_server_error()
        }
        AuthServiceError::Sql(source) => {
            error!("auth storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
