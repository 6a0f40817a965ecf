//! Admin
//!
//! Read-only back-office aggregates. Callers must act as an admin so that row-level
//! security exposes every user's orders.

pub mod errors;
pub mod models;
mod repository;
pub mod service;

pub use errors::AdminServiceError;
pub use service::*;
