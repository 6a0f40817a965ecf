//! Service test infrastructure.

mod context;
mod db;
pub mod helpers;

pub use context::TestContext;
