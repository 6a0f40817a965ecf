//! Storefront Client
//!
//! State containers and flows a storefront UI binds to: the in-session cart, its
//! durable mirror to the server cart, the checkout composer and a typed HTTP client for
//! the `/api` surface.

pub mod api;
pub mod checkout;
pub mod store;
pub mod sync;
