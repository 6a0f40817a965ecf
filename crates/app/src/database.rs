//! Database connection management

use sqlx::{PgPool, Postgres, Row, Transaction, postgres::PgRow, query, query_scalar};

use crate::auth::Principal;

/// SQL used to set the acting user and role for row-level security.
pub const SET_PRINCIPAL_CONTEXT_SQL: &str = "SELECT set_config('app.current_user_uuid', $1, true), \
     set_config('app.current_user_role', $2, true)";

const ROLE_BYPASSES_RLS_SQL: &str =
    "SELECT rolsuper OR rolbypassrls FROM pg_roles WHERE rolname = current_user";

#[derive(Debug, Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Begin a transaction without an acting user.
    ///
    /// Only rows readable by anonymous visitors are visible.
    ///
    /// # Errors
    ///
    /// Returns an error when starting the transaction fails.
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        self.pool.begin().await
    }

    /// Begin a transaction and set the principal for RLS policies.
    ///
    /// # Errors
    ///
    /// Returns an error when starting the transaction or setting the principal fails.
    pub async fn begin_principal_transaction(
        &self,
        principal: Principal,
    ) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        query(SET_PRINCIPAL_CONTEXT_SQL)
            .bind(principal.user.into_uuid().to_string())
            .bind(principal.role.as_str())
            .execute(&mut *tx)
            .await?;

        Ok(tx)
    }
}

/// Connect to `PostgreSQL`.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPool::connect(database_url).await
}

/// Whether the connected role is a superuser or has `BYPASSRLS`.
///
/// # Errors
///
/// Returns an error when the role lookup fails.
pub async fn role_bypasses_rls(pool: &PgPool) -> Result<bool, sqlx::Error> {
    query_scalar::<_, bool>(ROLE_BYPASSES_RLS_SQL)
        .fetch_one(pool)
        .await
}

/// Read a non-negative minor-unit amount stored as `BIGINT`.
pub(crate) fn try_get_amount(row: &PgRow, col: &str) -> Result<u64, sqlx::Error> {
    let amount: i64 = row.try_get(col)?;

    u64::try_from(amount).map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}

/// Read an optional non-negative minor-unit amount stored as `BIGINT`.
pub(crate) fn try_get_optional_amount(row: &PgRow, col: &str) -> Result<Option<u64>, sqlx::Error> {
    row.try_get::<Option<i64>, _>(col)?
        .map(|amount| {
            u64::try_from(amount).map_err(|e| sqlx::Error::ColumnDecode {
                index: col.to_string(),
                source: Box::new(e),
            })
        })
        .transpose()
}

/// Read a non-negative count stored as `INTEGER`.
pub(crate) fn try_get_count(row: &PgRow, col: &str) -> Result<u32, sqlx::Error> {
    let count: i32 = row.try_get(col)?;

    u32::try_from(count).map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}

/// Read a non-negative aggregate stored as `BIGINT`, such as `COUNT(*)`.
pub(crate) fn try_get_total(row: &PgRow, col: &str) -> Result<u64, sqlx::Error> {
    try_get_amount(row, col)
}

/// Convert an amount for binding into a `BIGINT` column.
pub(crate) fn amount_param(amount: u64, col: &str) -> Result<i64, sqlx::Error> {
    i64::try_from(amount).map_err(|e| {
        sqlx::Error::Encode(Box::new(ColumnEncodeError {
            column: col.to_string(),
            source: e,
        }))
    })
}

/// Convert a count for binding into an `INTEGER` column.
pub(crate) fn count_param(count: u32, col: &str) -> Result<i32, sqlx::Error> {
    i32::try_from(count).map_err(|e| {
        sqlx::Error::Encode(Box::new(ColumnEncodeError {
            column: col.to_string(),
            source: e,
        }))
    })
}

#[derive(Debug, thiserror::Error)]
#[error("value for column {column} is out of range")]
struct ColumnEncodeError {
    column: String,

    #[source]
    source: std::num::TryFromIntError,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_param_rejects_values_beyond_bigint() {
        assert!(amount_param(u64::MAX, "price").is_err());
        assert!(matches!(amount_param(250_000, "price"), Ok(250_000)));
    }

    #[test]
    fn count_param_rejects_values_beyond_integer() {
        assert!(count_param(u32::MAX, "quantity").is_err());
        assert!(matches!(count_param(3, "quantity"), Ok(3)));
    }
}
