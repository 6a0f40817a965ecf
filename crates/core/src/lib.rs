//! Storefront Core
//!
//! Pure storefront arithmetic shared by the server and its clients: money helpers, order
//! totals, deal evaluation, order status machines and pagination.

pub mod deals;
pub mod money;
pub mod orders;
pub mod pagination;
pub mod pricing;
