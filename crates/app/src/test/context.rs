//! Test context for service-level integration tests.

use std::sync::Arc;

use sqlx::{Connection, PgConnection, PgPool, query};
use storefront_core::pricing::PricingPolicy;

use crate::{
    auth::{AuthSettings, LoggingNotifier, PgAuthService, VerificationNotifier},
    database::Db,
    domain::{
        addresses::PgAddressesService,
        admin::{DEFAULT_LOW_STOCK_THRESHOLD, PgAdminService},
        carts::PgCartsService,
        catalog::PgCatalogService,
        deals::PgDealsService,
        orders::PgOrdersService,
        reviews::PgReviewsService,
    },
};

use super::db::{SUPERUSER, SUPERUSER_PASSWORD, TestDb};

/// Login role without RLS bypass, shared by every test database on the server.
const APP_ROLE: &str = "storefront_app_test";
const APP_ROLE_PASSWORD: &str = "storefront_app_test_pass";

pub struct TestContext {
    pub db: TestDb,
    pub auth: PgAuthService,
    pub catalog: PgCatalogService,
    pub carts: PgCartsService,
    pub addresses: PgAddressesService,
    pub orders: PgOrdersService,
    pub reviews: PgReviewsService,
    pub deals: PgDealsService,
    pub admin: PgAdminService,
}

impl TestContext {
    pub async fn new() -> Self {
        Self::with_notifier(Arc::new(LoggingNotifier)).await
    }

    /// Build a context whose auth service delivers codes through `notifier`.
    pub async fn with_notifier(notifier: Arc<dyn VerificationNotifier>) -> Self {
        let test_db = TestDb::new().await;
        let db = Db::new(Self::setup_app_pool(&test_db).await);

        Self {
            auth: PgAuthService::new(db.clone(), notifier, AuthSettings::default()),
            catalog: PgCatalogService::new(db.clone()),
            carts: PgCartsService::new(db.clone()),
            addresses: PgAddressesService::new(db.clone()),
            orders: PgOrdersService::new(db.clone(), PricingPolicy::default()),
            reviews: PgReviewsService::new(db.clone()),
            deals: PgDealsService::new(db.clone()),
            admin: PgAdminService::new(db, DEFAULT_LOW_STOCK_THRESHOLD),
            db: test_db,
        }
    }

    /// Ensure the restricted app role exists and return a pool connected as it.
    ///
    /// Superusers ignore RLS even when it is forced, so ownership checks are only
    /// exercised through this role.
    async fn setup_app_pool(test_db: &TestDb) -> PgPool {
        let su_url = &test_db.superuser_url;

        let server_url = su_url
            .rsplit_once('/')
            .map_or_else(|| su_url.clone(), |(base, _)| format!("{base}/postgres"));

        let mut server_conn = PgConnection::connect(&server_url)
            .await
            .expect("Failed to connect to postgres database for role setup");

        let created = query(&format!(
            "CREATE ROLE {APP_ROLE} WITH LOGIN PASSWORD '{APP_ROLE_PASSWORD}' \
               NOSUPERUSER NOCREATEDB NOCREATEROLE NOBYPASSRLS"
        ))
        .execute(&mut server_conn)
        .await;

        // Parallel tests race to create the role; losing the race is fine.
        if let Err(error) = created {
            let already_exists = matches!(
                &error,
                sqlx::Error::Database(db_error)
                    if matches!(db_error.code().as_deref(), Some("42710" | "23505"))
            );

            assert!(already_exists, "Failed to create app role: {error}");
        }

        query(&format!(
            "GRANT CONNECT ON DATABASE \"{}\" TO {APP_ROLE}",
            test_db.name
        ))
        .execute(&mut server_conn)
        .await
        .expect("Failed to grant CONNECT on test database");

        server_conn
            .close()
            .await
            .expect("Failed to close server connection");

        let mut db_conn = PgConnection::connect(su_url)
            .await
            .expect("Failed to connect to test database for privilege setup");

        for stmt in [
            format!("GRANT USAGE ON SCHEMA public TO {APP_ROLE}"),
            format!(
                "GRANT SELECT, INSERT, UPDATE, DELETE ON ALL TABLES IN SCHEMA public TO {APP_ROLE}"
            ),
            format!("GRANT USAGE, SELECT, UPDATE ON ALL SEQUENCES IN SCHEMA public TO {APP_ROLE}"),
        ] {
            query(&stmt)
                .execute(&mut db_conn)
                .await
                .expect("Failed to grant privileges to app role");
        }

        db_conn
            .close()
            .await
            .expect("Failed to close db connection");

        let app_url = su_url.replacen(
            &format!("{SUPERUSER}:{SUPERUSER_PASSWORD}"),
            &format!("{APP_ROLE}:{APP_ROLE_PASSWORD}"),
            1,
        );

        PgPool::connect(&app_url)
            .await
            .expect("Failed to create app pool")
    }
}
