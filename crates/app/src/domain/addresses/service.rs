//! Addresses service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    auth::Principal,
    database::Db,
    domain::addresses::{
        errors::AddressesServiceError,
        models::{Address, AddressUpdate, AddressUuid, NewAddress},
        repository::PgAddressesRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgAddressesService {
    db: Db,
    repository: PgAddressesRepository,
}

impl PgAddressesService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgAddressesRepository::new(),
        }
    }
}

#[async_trait]
impl AddressesService for PgAddressesService {
    #[tracing::instrument(
        name = "addresses.service.list_addresses",
        skip(self),
        fields(user_uuid = %principal.user),
        err
    )]
    async fn list_addresses(
        &self,
        principal: Principal,
    ) -> Result<Vec<Address>, AddressesServiceError> {
        let mut tx = self.db.begin_principal_transaction(principal).await?;

        let addresses = self
            .repository
            .list_addresses(&mut tx, principal.user)
            .await?;

        tx.commit().await?;

        Ok(addresses)
    }

    #[tracing::instrument(
        name = "addresses.service.get_address",
        skip(self),
        fields(user_uuid = %principal.user, address_uuid = %address),
        err
    )]
    async fn get_address(
        &self,
        principal: Principal,
        address: AddressUuid,
    ) -> Result<Address, AddressesServiceError> {
        let mut tx = self.db.begin_principal_transaction(principal).await?;

        let found = self
            .repository
            .get_address(&mut tx, principal.user, address)
            .await?;

        tx.commit().await?;

        Ok(found)
    }

    #[tracing::instrument(
        name = "addresses.service.create_address",
        skip(self, address),
        fields(user_uuid = %principal.user, address_uuid = tracing::field::Empty),
        err
    )]
    async fn create_address(
        &self,
        principal: Principal,
        address: NewAddress,
    ) -> Result<Address, AddressesServiceError> {
        if let Some(field) = address.missing_field() {
            return Err(AddressesServiceError::MissingField(field));
        }

        let uuid = AddressUuid::new();

        tracing::Span::current().record("address_uuid", tracing::field::display(uuid));

        let mut tx = self.db.begin_principal_transaction(principal).await?;

        let is_first = self
            .repository
            .count_addresses(&mut tx, principal.user)
            .await?
            == 0;

        let is_default = address.is_default || is_first;

        if is_default {
            self.repository
                .clear_default(&mut tx, principal.user, uuid)
                .await?;
        }

        let created = self
            .repository
            .create_address(
                &mut tx,
                principal.user,
                uuid,
                &NewAddress {
                    is_default,
                    ..address
                },
            )
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    #[tracing::instrument(
        name = "addresses.service.update_address",
        skip(self, update),
        fields(user_uuid = %principal.user, address_uuid = %address),
        err
    )]
    async fn update_address(
        &self,
        principal: Principal,
        address: AddressUuid,
        update: AddressUpdate,
    ) -> Result<Address, AddressesServiceError> {
        if let Some(field) = update.blank_field() {
            return Err(AddressesServiceError::MissingField(field));
        }

        let mut tx = self.db.begin_principal_transaction(principal).await?;

        // Ownership check before any default is cleared.
        self.repository
            .get_address(&mut tx, principal.user, address)
            .await?;

        if update.is_default == Some(true) {
            self.repository
                .clear_default(&mut tx, principal.user, address)
                .await?;
        }

        let updated = self
            .repository
            .update_address(&mut tx, principal.user, address, &update)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    #[tracing::instrument(
        name = "addresses.service.delete_address",
        skip(self),
        fields(user_uuid = %principal.user, address_uuid = %address),
        err
    )]
    async fn delete_address(
        &self,
        principal: Principal,
        address: AddressUuid,
    ) -> Result<(), AddressesServiceError> {
        let mut tx = self.db.begin_principal_transaction(principal).await?;

        let rows_affected = self
            .repository
            .delete_address(&mut tx, principal.user, address)
            .await?;

        if rows_affected == 0 {
            return Err(AddressesServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait AddressesService: Send + Sync {
    /// The principal's address book, default first.
    async fn list_addresses(
        &self,
        principal: Principal,
    ) -> Result<Vec<Address>, AddressesServiceError>;

    async fn get_address(
        &self,
        principal: Principal,
        address: AddressUuid,
    ) -> Result<Address, AddressesServiceError>;

    /// Create an address. The first address, or one flagged default, becomes the only default.
    async fn create_address(
        &self,
        principal: Principal,
        address: NewAddress,
    ) -> Result<Address, AddressesServiceError>;

    /// Partially update an address. Setting `is_default` unsets every other default.
    async fn update_address(
        &self,
        principal: Principal,
        address: AddressUuid,
        update: AddressUpdate,
    ) -> Result<Address, AddressesServiceError>;

    async fn delete_address(
        &self,
        principal: Principal,
        address: AddressUuid,
    ) -> Result<(), AddressesServiceError>;
}
