use std::sync::Arc;

use clap::Args;
use storefront_app::{
    auth::{AuthService, AuthServiceError, AuthSettings, LoggingNotifier, PgAuthService, Role},
    database::{self, Db},
};

#[derive(Debug, Args)]
pub(crate) struct SetRoleArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Email address of the account
    #[arg(long)]
    email: String,
}

pub(crate) async fn run(args: SetRoleArgs, role: Role) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = PgAuthService::new(
        Db::new(pool),
        Arc::new(LoggingNotifier),
        AuthSettings::default(),
    );

    let profile = service
        .set_role(&args.email, role)
        .await
        .map_err(|error| match error {
            AuthServiceError::ProfileNotFound => format!("no account with email {}", args.email),
            other => format!("failed to update role: {other}"),
        })?;

    println!("{} is now {}", profile.email, profile.role);

    Ok(())
}
