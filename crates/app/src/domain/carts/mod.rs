//! Carts
//!
//! Server-side cart rows of a signed-in user. One row per product; adding an existing
//! product merges quantities.

pub mod errors;
pub mod models;
mod repository;
pub mod service;

pub use errors::CartsServiceError;
pub use service::*;
