//! Database Config

use clap::Args;

/// Database settings.
#[derive(Debug, Args)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection string for the application role
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: String,

    /// Start even if the role bypasses row-level security (local development only)
    #[arg(long, env = "ALLOW_RLS_BYPASS", default_value_t = false)]
    pub allow_rls_bypass: bool,
}
