//! Admin Handlers

pub(crate) mod customers;
pub(crate) mod stats;
