//! Storefront Domain Concerns

pub mod addresses;
pub mod admin;
pub mod carts;
pub mod catalog;
pub mod deals;
pub mod orders;
pub mod reviews;
