//! Orders service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use storefront_core::{orders::OrderStateError, pricing::PricingError};
use thiserror::Error;

use crate::domain::catalog::models::ProductUuid;

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("order not found")]
    NotFound,

    #[error("an order needs at least one item")]
    EmptyOrder,

    #[error("quantity must be at least 1")]
    InvalidQuantity,

    #[error("address not found")]
    InvalidAddress,

    #[error("product {product} is not available")]
    ProductUnavailable { product: ProductUuid },

    #[error("price of product {product} changed from {submitted} to {current}")]
    PriceChanged {
        product: ProductUuid,
        submitted: u64,
        current: u64,
    },

    #[error("only {available} units of product {product} in stock")]
    InsufficientStock {
        product: ProductUuid,
        available: u32,
    },

    #[error("nothing to update")]
    EmptyUpdate,

    #[error(transparent)]
    InvalidTransition(#[from] OrderStateError),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("order number already in use")]
    AlreadyExists,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for OrdersServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        if matches!(error, Error::Encode(_)) {
            return Self::InvalidData;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidAddress,
            Some(ErrorKind::CheckViolation | ErrorKind::NotNullViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
