//! Addresses Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::{
    auth::UserUuid,
    database::try_get_total,
    domain::addresses::models::{Address, AddressUpdate, AddressUuid, NewAddress},
};

const LIST_ADDRESSES_SQL: &str = include_str!("sql/list_addresses.sql");
const GET_ADDRESS_SQL: &str = include_str!("sql/get_address.sql");
const COUNT_ADDRESSES_SQL: &str = include_str!("sql/count_addresses.sql");
const CLEAR_DEFAULT_ADDRESS_SQL: &str = include_str!("sql/clear_default_address.sql");
const CREATE_ADDRESS_SQL: &str = include_str!("sql/create_address.sql");
const UPDATE_ADDRESS_SQL: &str = include_str!("sql/update_address.sql");
const DELETE_ADDRESS_SQL: &str = include_str!("sql/delete_address.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgAddressesRepository;

impl PgAddressesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_addresses(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<Address>, sqlx::Error> {
        query_as::<Postgres, Address>(LIST_ADDRESSES_SQL)
            .bind(user.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_address(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        address: AddressUuid,
    ) -> Result<Address, sqlx::Error> {
        query_as::<Postgres, Address>(GET_ADDRESS_SQL)
            .bind(address.into_uuid())
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn count_addresses(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<u64, sqlx::Error> {
        let row = query(COUNT_ADDRESSES_SQL)
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        try_get_total(&row, "total")
    }

    /// Unset the default flag on every address of `user` except `keep`.
    pub(crate) async fn clear_default(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        keep: AddressUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(CLEAR_DEFAULT_ADDRESS_SQL)
            .bind(user.into_uuid())
            .bind(keep.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn create_address(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        uuid: AddressUuid,
        address: &NewAddress,
    ) -> Result<Address, sqlx::Error> {
        query_as::<Postgres, Address>(CREATE_ADDRESS_SQL)
            .bind(uuid.into_uuid())
            .bind(user.into_uuid())
            .bind(address.full_name.trim())
            .bind(address.phone.as_deref())
            .bind(address.address_line1.trim())
            .bind(address.address_line2.as_deref())
            .bind(address.city.trim())
            .bind(address.state.as_deref())
            .bind(address.postal_code.trim())
            .bind(address.country.trim())
            .bind(address.is_default)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_address(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        address: AddressUuid,
        update: &AddressUpdate,
    ) -> Result<Address, sqlx::Error> {
        query_as::<Postgres, Address>(UPDATE_ADDRESS_SQL)
            .bind(address.into_uuid())
            .bind(user.into_uuid())
            .bind(update.full_name.as_deref().map(str::trim))
            .bind(update.phone.as_ref().and_then(Option::as_deref))
            .bind(update.address_line1.as_deref().map(str::trim))
            .bind(update.address_line2.as_ref().and_then(Option::as_deref))
            .bind(update.city.as_deref().map(str::trim))
            .bind(update.state.as_ref().and_then(Option::as_deref))
            .bind(update.postal_code.as_deref().map(str::trim))
            .bind(update.country.as_deref().map(str::trim))
            .bind(update.is_default)
            .bind(update.phone.is_some())
            .bind(update.address_line2.is_some())
            .bind(update.state.is_some())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_address(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        address: AddressUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_ADDRESS_SQL)
            .bind(address.into_uuid())
            .bind(user.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for Address {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: AddressUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            full_name: row.try_get("full_name")?,
            phone: row.try_get("phone")?,
            address_line1: row.try_get("address_line1")?,
            address_line2: row.try_get("address_line2")?,
            city: row.try_get("city")?,
            state: row.try_get("state")?,
            postal_code: row.try_get("postal_code")?,
            country: row.try_get("country")?,
            is_default: row.try_get("is_default")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
