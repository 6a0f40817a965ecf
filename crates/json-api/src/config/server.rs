//! Server Config

use std::time::Duration;

use clap::Args;

/// Listener settings.
#[derive(Debug, Args)]
pub struct ServerRuntimeConfig {
    /// Address to bind
    #[arg(short = 'H', long, env = "SERVER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to bind
    #[arg(short, long, env = "SERVER_PORT", default_value_t = 3000_u16)]
    pub port: u16,

    /// Seconds in-flight requests get to finish after a stop signal
    #[arg(long, env = "SHUTDOWN_GRACE_SECS", default_value_t = 30_u64)]
    pub shutdown_grace_secs: u64,
}

impl ServerRuntimeConfig {
    #[must_use]
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    #[must_use]
    pub const fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}
