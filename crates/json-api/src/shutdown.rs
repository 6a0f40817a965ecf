//! Graceful shutdown on SIGINT / SIGTERM.

use std::{fmt, io, time::Duration};

use salvo::server::ServerHandle;
use thiserror::Error;
use tokio::signal;
use tracing::info;

#[derive(Debug, Error)]
pub(crate) enum ShutdownSignalError {
    #[error("failed to install Ctrl+C handler: {0}")]
    CtrlC(#[source] io::Error),

    #[cfg(unix)]
    #[error("failed to install SIGTERM handler: {0}")]
    SigTerm(#[source] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopSignal {
    Interrupt,
    Terminate,
}

impl fmt::Display for StopSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Interrupt => "interrupt",
            Self::Terminate => "terminate",
        })
    }
}

#[cfg(unix)]
async fn wait_for_signal() -> Result<StopSignal, ShutdownSignalError> {
    let mut terminate = signal::unix::signal(signal::unix::SignalKind::terminate())
        .map_err(ShutdownSignalError::SigTerm)?;

    tokio::select! {
        result = signal::ctrl_c() => result
            .map(|()| StopSignal::Interrupt)
            .map_err(ShutdownSignalError::CtrlC),
        _ = terminate.recv() => Ok(StopSignal::Terminate),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> Result<StopSignal, ShutdownSignalError> {
    signal::ctrl_c()
        .await
        .map(|()| StopSignal::Interrupt)
        .map_err(ShutdownSignalError::CtrlC)
}

/// Stop accepting connections on the first stop signal and give in-flight requests, such
/// as an order placement transaction, `grace` to finish.
pub(crate) async fn listen(handle: ServerHandle, grace: Duration) -> Result<(), ShutdownSignalError> {
    let received = wait_for_signal().await?;

    info!(signal = %received, grace_secs = grace.as_secs(), "shutting down storefront API");

    handle.stop_graceful(grace);

    Ok(())
}
