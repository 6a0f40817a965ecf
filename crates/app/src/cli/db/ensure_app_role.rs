use clap::Args;
use sqlx::{Postgres, Transaction, query, query_scalar};
use storefront_app::database;

#[derive(Debug, Args)]
pub(crate) struct EnsureAppRoleArgs {
    /// Administrative PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Login role the JSON API connects as
    #[arg(long, default_value = "storefront_app")]
    role_name: String,

    /// Password for the login role
    #[arg(long, env = "APP_DB_PASSWORD", hide_env_values = true)]
    password: String,
}

/// Quote `value` server-side with `quote_ident` or `quote_literal`.
async fn quote(
    tx: &mut Transaction<'_, Postgres>,
    function: &str,
    value: &str,
) -> Result<String, String> {
    query_scalar(&format!("SELECT {function}($1)"))
        .bind(value)
        .fetch_one(&mut **tx)
        .await
        .map_err(|error| format!("failed to {function} `{value}`: {error}"))
}

pub(crate) async fn run(args: EnsureAppRoleArgs) -> Result<(), String> {
    if args.role_name.trim().is_empty() {
        return Err("role_name cannot be empty".to_string());
    }

    if args.password.trim().is_empty() {
        return Err("password cannot be empty".to_string());
    }

    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let mut tx = pool
        .begin()
        .await
        .map_err(|error| format!("failed to start transaction: {error}"))?;

    let role = quote(&mut tx, "quote_ident", &args.role_name).await?;
    let password = quote(&mut tx, "quote_literal", &args.password).await?;

    let exists: bool = query_scalar("SELECT EXISTS (SELECT 1 FROM pg_roles WHERE rolname = $1)")
        .bind(&args.role_name)
        .fetch_one(&mut *tx)
        .await
        .map_err(|error| format!("failed to check role existence: {error}"))?;

    // The API refuses to start on a role that can bypass row-level security.
    let verb = if exists { "ALTER" } else { "CREATE" };

    query(&format!(
        "{verb} ROLE {role} LOGIN PASSWORD {password} \
         NOSUPERUSER NOCREATEDB NOCREATEROLE NOREPLICATION NOBYPASSRLS"
    ))
    .execute(&mut *tx)
    .await
    .map_err(|error| format!("failed to {} role: {error}", verb.to_lowercase()))?;

    let database: String = query_scalar("SELECT quote_ident(current_database())")
        .fetch_one(&mut *tx)
        .await
        .map_err(|error| format!("failed to resolve database name: {error}"))?;

    let grants = [
        format!("GRANT CONNECT ON DATABASE {database} TO {role}"),
        format!("GRANT USAGE ON SCHEMA public TO {role}"),
        format!("GRANT SELECT, INSERT, UPDATE, DELETE ON ALL TABLES IN SCHEMA public TO {role}"),
        // `order_number_seq` is advanced with nextval.
        format!("GRANT USAGE, SELECT, UPDATE ON ALL SEQUENCES IN SCHEMA public TO {role}"),
        format!(
            "ALTER DEFAULT PRIVILEGES IN SCHEMA public \
             GRANT SELECT, INSERT, UPDATE, DELETE ON TABLES TO {role}"
        ),
        format!(
            "ALTER DEFAULT PRIVILEGES IN SCHEMA public \
             GRANT USAGE, SELECT, UPDATE ON SEQUENCES TO {role}"
        ),
    ];

    for sql in grants {
        query(&sql)
            .execute(&mut *tx)
            .await
            .map_err(|error| format!("failed to apply `{sql}`: {error}"))?;
    }

    tx.commit()
        .await
        .map_err(|error| format!("failed to commit changes: {error}"))?;

    println!("ensured app role: {}", args.role_name);

    Ok(())
}
