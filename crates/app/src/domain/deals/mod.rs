//! Deals

pub mod errors;
pub mod models;
mod repository;
pub mod service;

pub use errors::DealsServiceError;
pub use service::*;
