//! Admin service errors.

use sqlx::Error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdminServiceError {
    #[error("admin role required")]
    Forbidden,

    #[error("storage error")]
    Sql(#[from] Error),
}
