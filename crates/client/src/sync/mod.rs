//! Cart/Server Sync
//!
//! Local cart mutations are applied to the [`CartStore`](crate::store::CartStore) first and
//! then queued in a durable [`Outbox`]. [`CartSync::flush`] replays the queue against the
//! server cart in order, retrying transient failures with backoff. The queue belongs to
//! one account and is dropped when a different account flushes it. Hydration refuses to
//! overwrite the local cart while queued operations are still waiting to be delivered,
//! and on the first hydration after sign-in the guest cart is merged into the server cart.

use thiserror::Error;

use crate::api::ApiError;

mod cart_sync;
mod mirror;
mod outbox;
mod retry;

pub use cart_sync::*;
pub use mirror::*;
pub use outbox::*;
pub use retry::*;

/// Errors surfaced by the sync layer.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Reading or writing the outbox file failed.
    #[error("outbox storage error: {0}")]
    Io(#[from] std::io::Error),

    /// The outbox file cannot be decoded.
    #[error("outbox encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    /// The server call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}
