//! Deals service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use storefront_core::deals::DealError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DealsServiceError {
    #[error("deal not found")]
    NotFound,

    #[error("title is required")]
    MissingTitle,

    #[error(transparent)]
    Invalid(#[from] DealError),

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for DealsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        if matches!(error, Error::Encode(_)) {
            return Self::InvalidData;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::CheckViolation | ErrorKind::NotNullViolation) => Self::InvalidData,
            Some(
                ErrorKind::UniqueViolation | ErrorKind::ForeignKeyViolation | ErrorKind::Other | _,
            )
            | None => Self::Sql(error),
        }
    }
}
