//! Per-test PostgreSQL databases inside one shared container.

use once_cell::sync::Lazy;
use sqlx::{Connection, PgConnection, PgPool, Postgres, Transaction};
use testcontainers::{ContainerAsync, ImageExt, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres as PostgresImage;
use tokio::sync::{OnceCell, mpsc};
use uuid::Uuid;

pub(super) const SUPERUSER: &str = "storefront_test";
pub(super) const SUPERUSER_PASSWORD: &str = "storefront_test_password";

const RESERVED_NAMES: [&str; 15] = [
    "user", "table", "select", "insert", "update", "delete", "drop", "create", "alter", "index",
    "database", "schema", "role", "grant", "revoke",
];

/// Check a database name before it is interpolated into `CREATE`/`DROP DATABASE`.
fn validate_database_name(name: &str) -> Result<(), String> {
    if name.is_empty() || name.len() > 63 {
        return Err("database name must be 1-63 characters long".to_string());
    }

    let starts_well = name
        .chars()
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_');

    if !starts_well {
        return Err("database name must start with a letter or underscore".to_string());
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
    {
        return Err("database name may only contain letters, digits, `_` and `$`".to_string());
    }

    if RESERVED_NAMES
        .iter()
        .any(|word| name.eq_ignore_ascii_case(word))
    {
        return Err(format!("database name '{name}' is a reserved word"));
    }

    Ok(())
}

static POSTGRES_CONTAINER: Lazy<OnceCell<ContainerAsync<PostgresImage>>> = Lazy::new(OnceCell::new);

static CLEANUP_SENDER: Lazy<OnceCell<mpsc::UnboundedSender<String>>> = Lazy::new(OnceCell::new);

async fn start_container() -> ContainerAsync<PostgresImage> {
    PostgresImage::default()
        .with_user(SUPERUSER)
        .with_password(SUPERUSER_PASSWORD)
        .with_db_name("storefront_test")
        .with_env_var("POSTGRES_INITDB_ARGS", "--auth-host=trust")
        .start()
        .await
        .expect("Failed to start PostgreSQL container")
}

async fn start_cleanup_task() -> mpsc::UnboundedSender<String> {
    let (sender, mut receiver) = mpsc::unbounded_channel::<String>();

    tokio::spawn(async move {
        while let Some(db_name) = receiver.recv().await {
            drop_database(&db_name).await;
        }
    });

    sender
}

/// `postgresql://` URL for `database` on the shared container, as the superuser.
async fn superuser_url(database: &str) -> Option<String> {
    let container = POSTGRES_CONTAINER.get()?;
    let port = container.get_host_port_ipv4(5432).await.ok()?;

    let host =
        std::env::var("TESTCONTAINERS_HOST_OVERRIDE").unwrap_or_else(|_| "localhost".to_string());

    Some(format!(
        "postgresql://{SUPERUSER}:{SUPERUSER_PASSWORD}@{host}:{port}/{database}"
    ))
}

async fn drop_database(db_name: &str) {
    if validate_database_name(db_name).is_err() {
        return;
    }

    let Some(url) = superuser_url("postgres").await else {
        return;
    };

    if let Ok(mut conn) = PgConnection::connect(&url).await {
        let result = sqlx::query(&format!(
            "DROP DATABASE IF EXISTS \"{db_name}\" WITH (FORCE)"
        ))
        .execute(&mut conn)
        .await;

        if let Err(error) = result {
            eprintln!("Failed to drop test database '{db_name}': {error}");
        }

        let _closed = conn.close().await;
    }
}

/// A freshly migrated database owned by one test.
///
/// Services commit normally; isolation comes from every test getting its own
/// database. The database is dropped in the background when this value is dropped.
#[derive(Debug, Clone)]
pub struct TestDb {
    pub pool: PgPool,
    pub name: String,

    /// Superuser URL for this database, used to derive the restricted app role URL.
    pub(super) superuser_url: String,
}

impl Drop for TestDb {
    fn drop(&mut self) {
        if let Some(sender) = CLEANUP_SENDER.get() {
            let _sent = sender.send(self.name.clone());
        }
    }
}

impl TestDb {
    /// Create a database with a generated unique name.
    pub async fn new() -> Self {
        let name = format!("storefront_test_{}", Uuid::now_v7().simple());

        Self::named(&name).await
    }

    /// Create a database with the given name and run every migration against it.
    pub async fn named(db_name: &str) -> Self {
        CLEANUP_SENDER.get_or_init(start_cleanup_task).await;
        POSTGRES_CONTAINER.get_or_init(start_container).await;

        if let Err(error) = validate_database_name(db_name) {
            panic!("Invalid database name '{db_name}': {error}");
        }

        let server_url = superuser_url("postgres")
            .await
            .expect("Failed to resolve container port");

        let mut conn = PgConnection::connect(&server_url)
            .await
            .expect("Failed to connect to postgres database");

        sqlx::query(&format!("CREATE DATABASE \"{db_name}\""))
            .execute(&mut conn)
            .await
            .expect("Failed to create test database");

        conn.close()
            .await
            .expect("Failed to close admin connection");

        let database_url = superuser_url(db_name)
            .await
            .expect("Failed to resolve container port");

        let pool = PgPool::connect(&database_url)
            .await
            .expect("Failed to create pool for database");

        sqlx::migrate!("../../migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations on database");

        Self {
            pool,
            name: db_name.to_string(),
            superuser_url: database_url,
        }
    }

    /// Begin a superuser transaction that rolls back when dropped.
    pub async fn begin_test_transaction(&self) -> Transaction<'_, Postgres> {
        self.pool
            .begin()
            .await
            .expect("Failed to start test transaction")
    }

    /// Superuser pool, which bypasses row-level security.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_names() {
        assert!(validate_database_name("storefront_test_0190").is_ok());
        assert!(validate_database_name("_leading_underscore").is_ok());
        assert!(validate_database_name("with$dollar").is_ok());
    }

    #[test]
    fn rejects_empty_and_overlong_names() {
        assert!(validate_database_name("").is_err());
        assert!(validate_database_name(&"a".repeat(64)).is_err());
    }

    #[test]
    fn rejects_bad_leading_characters() {
        assert!(validate_database_name("1orders").is_err());
        assert!(validate_database_name("-orders").is_err());
        assert!(validate_database_name("$orders").is_err());
    }

    #[test]
    fn rejects_quotes_and_punctuation() {
        assert!(validate_database_name("orders\"; DROP").is_err());
        assert!(validate_database_name("orders-test").is_err());
        assert!(validate_database_name("orders.test").is_err());
    }

    #[test]
    fn rejects_reserved_words_in_any_case() {
        assert!(validate_database_name("user").is_err());
        assert!(validate_database_name("GRANT").is_err());
    }

    #[tokio::test]
    async fn fresh_database_has_migrated_tables() {
        let test_db = TestDb::new().await;

        let tables: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM information_schema.tables \
             WHERE table_schema = 'public' AND table_name IN ('products', 'orders', 'cart_items')",
        )
        .fetch_one(test_db.pool())
        .await
        .expect("Failed to count tables");

        assert_eq!(tables, 3, "core tables should exist after migrations");
    }

    #[tokio::test]
    async fn test_transactions_roll_back_on_drop() {
        let test_db = TestDb::new().await;

        {
            let mut tx = test_db.begin_test_transaction().await;

            sqlx::query("CREATE TABLE scratch (id INTEGER)")
                .execute(&mut *tx)
                .await
                .expect("Failed to create scratch table");
        }

        let result = sqlx::query("SELECT COUNT(*) FROM scratch")
            .fetch_one(test_db.pool())
            .await;

        assert!(
            result.is_err(),
            "scratch table should have been rolled back"
        );
    }
}
