//! Orders
//!
//! Orders are placed from a cart in one transaction: live prices and stock are
//! re-validated under row locks, totals are computed with the shared pricing policy,
//! stock is decremented and the persisted cart is cleared. After that only the
//! fulfilment and payment statuses change.

pub mod errors;
pub mod models;
mod number;
mod placement;
mod repository;
pub mod service;

pub use errors::OrdersServiceError;
pub use number::format_order_number;
pub use service::*;
