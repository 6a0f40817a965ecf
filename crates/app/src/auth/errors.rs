//! Auth service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::auth::{PasswordError, SessionTokenError, ValidationError};

#[derive(Debug, Error)]
pub enum AuthServiceError {
    #[error("session not found")]
    NotFound,

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("email address is already registered")]
    EmailTaken,

    #[error("invalid or expired verification code")]
    InvalidVerificationCode,

    #[error("profile not found")]
    ProfileNotFound,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("password hashing error")]
    Password(#[from] PasswordError),

    #[error("session token processing error")]
    Token(#[from] SessionTokenError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for AuthServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::ProfileNotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::EmailTaken,
            Some(_) | None => Self::Sql(error),
        }
    }
}
