//! Carts service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error("cart item not found")]
    NotFound,

    #[error("product not found or not available")]
    ProductUnavailable,

    #[error("only {available} units in stock")]
    InsufficientStock { available: u32 },

    #[error("quantity must be at least 1")]
    InvalidQuantity,

    #[error("related resource not found")]
    InvalidReference,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for CartsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        if matches!(error, Error::Encode(_)) {
            return Self::InvalidData;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::CheckViolation | ErrorKind::NotNullViolation) => Self::InvalidData,
            Some(ErrorKind::UniqueViolation | ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
