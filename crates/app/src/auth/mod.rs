//! Authentication

mod errors;
mod models;
mod notifier;
mod password;
mod repository;
mod service;
mod token;
mod validation;

pub use errors::*;
pub use models::*;
pub use notifier::*;
pub use password::*;
pub use service::*;
pub use token::*;
pub use validation::*;
