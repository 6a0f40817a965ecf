//! Admin Dashboard

mod errors;
mod handlers;
mod models;

pub(crate) use errors::*;
pub(crate) use handlers::*;
pub(crate) use models::*;
