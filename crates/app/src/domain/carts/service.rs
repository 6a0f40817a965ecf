//! Carts service.

use async_trait::async_trait;
use mockall::automock;
use tracing::Span;

use crate::{
    auth::Principal,
    database::Db,
    domain::carts::{
        errors::CartsServiceError,
        models::{Cart, CartItem, CartItemUuid, NewCartItem},
        repository::PgCartItemsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    repository: PgCartItemsRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCartItemsRepository::new(),
        }
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    #[tracing::instrument(
        name = "carts.service.get_cart",
        skip(self),
        fields(user_uuid = %principal.user, items = tracing::field::Empty),
        err
    )]
    async fn get_cart(&self, principal: Principal) -> Result<Cart, CartsServiceError> {
        let mut tx = self.db.begin_principal_transaction(principal).await?;

        let items = self
            .repository
            .list_cart_items(&mut tx, principal.user)
            .await?;

        tx.commit().await?;

        Span::current().record("items", items.len());

        Ok(Cart { items })
    }

    #[tracing::instrument(
        name = "carts.service.add_item",
        skip(self, item),
        fields(
            user_uuid = %principal.user,
            product_uuid = %item.product_uuid,
            quantity = item.quantity
        ),
        err
    )]
    async fn add_item(
        &self,
        principal: Principal,
        item: NewCartItem,
    ) -> Result<CartItem, CartsServiceError> {
        if item.quantity == 0 {
            return Err(CartsServiceError::InvalidQuantity);
        }

        let mut tx = self.db.begin_principal_transaction(principal).await?;

        let available = self
            .repository
            .get_available_stock(&mut tx, item.product_uuid)
            .await?
            .ok_or(CartsServiceError::ProductUnavailable)?;

        if item.quantity > available {
            return Err(CartsServiceError::InsufficientStock { available });
        }

        let uuid = self
            .repository
            .upsert_cart_item(&mut tx, principal.user, item, available)
            .await?
            .ok_or(CartsServiceError::InsufficientStock { available })?;

        let saved = self
            .repository
            .get_cart_item(&mut tx, principal.user, uuid)
            .await?;

        tx.commit().await?;

        Ok(saved)
    }

    #[tracing::instrument(
        name = "carts.service.update_quantity",
        skip(self),
        fields(user_uuid = %principal.user, item_uuid = %item),
        err
    )]
    async fn update_quantity(
        &self,
        principal: Principal,
        item: CartItemUuid,
        quantity: u32,
    ) -> Result<CartItem, CartsServiceError> {
        if quantity == 0 {
            return Err(CartsServiceError::InvalidQuantity);
        }

        let mut tx = self.db.begin_principal_transaction(principal).await?;

        let existing = self
            .repository
            .get_cart_item(&mut tx, principal.user, item)
            .await?;

        let available = self
            .repository
            .get_available_stock(&mut tx, existing.product_uuid)
            .await?
            .ok_or(CartsServiceError::ProductUnavailable)?;

        if quantity > available {
            return Err(CartsServiceError::InsufficientStock { available });
        }

        self.repository
            .update_quantity(&mut tx, principal.user, item, quantity)
            .await?;

        let updated = self
            .repository
            .get_cart_item(&mut tx, principal.user, item)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    #[tracing::instrument(
        name = "carts.service.remove_item",
        skip(self),
        fields(user_uuid = %principal.user, item_uuid = %item),
        err
    )]
    async fn remove_item(
        &self,
        principal: Principal,
        item: CartItemUuid,
    ) -> Result<(), CartsServiceError> {
        let mut tx = self.db.begin_principal_transaction(principal).await?;

        let rows_affected = self
            .repository
            .delete_cart_item(&mut tx, principal.user, item)
            .await?;

        if rows_affected == 0 {
            return Err(CartsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    #[tracing::instrument(
        name = "carts.service.clear_cart",
        skip(self),
        fields(user_uuid = %principal.user, removed = tracing::field::Empty),
        err
    )]
    async fn clear_cart(&self, principal: Principal) -> Result<u64, CartsServiceError> {
        let mut tx = self.db.begin_principal_transaction(principal).await?;

        let removed = self.repository.clear_cart(&mut tx, principal.user).await?;

        tx.commit().await?;

        Span::current().record("removed", removed);

        Ok(removed)
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// The principal's cart with live product data.
    async fn get_cart(&self, principal: Principal) -> Result<Cart, CartsServiceError>;

    /// Add a product, merging with an existing line. The merged quantity may not exceed stock.
    async fn add_item(
        &self,
        principal: Principal,
        item: NewCartItem,
    ) -> Result<CartItem, CartsServiceError>;

    /// Replace a line's quantity.
    async fn update_quantity(
        &self,
        principal: Principal,
        item: CartItemUuid,
        quantity: u32,
    ) -> Result<CartItem, CartsServiceError>;

    async fn remove_item(
        &self,
        principal: Principal,
        item: CartItemUuid,
    ) -> Result<(), CartsServiceError>;

    /// Delete every line; returns how many were removed.
    async fn clear_cart(&self, principal: Principal) -> Result<u64, CartsServiceError>;
}
