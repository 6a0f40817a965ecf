//! Server cart mirror.

use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::{ApiResult, CartItem};

/// A cart mutation waiting to be applied to the server cart.
///
/// Every operation carries the state the row should end up in rather than a delta, so
/// replaying one after a lost response leaves the server cart unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum MirrorOp {
    /// Make the product's row hold exactly `quantity` units, creating it if needed.
    SetQuantity {
        /// Product the row is for.
        product_id: Uuid,
        /// Quantity of the local line.
        quantity: u32,
    },

    /// Delete the product's row if there is one.
    Remove {
        /// Product the row is for.
        product_id: Uuid,
    },

    /// Delete every row.
    Clear,
}

/// The persisted cart the local store is mirrored into.
#[automock]
#[async_trait]
pub trait CartMirror: Send + Sync {
    /// The signed-in user calls are made for, if any.
    fn account(&self) -> Option<Uuid>;

    /// Forget the session.
    fn sign_out(&mut self);

    /// Every row of the user's server cart.
    async fn fetch_cart(&self) -> ApiResult<Vec<CartItem>>;

    /// Add units of a product; the server sums them into an existing row.
    async fn add_item(&self, product_id: Uuid, quantity: u32) -> ApiResult<CartItem>;

    /// Overwrite a row's quantity.
    async fn update_item(&self, item_id: Uuid, quantity: u32) -> ApiResult<CartItem>;

    /// Delete one row.
    async fn remove_item(&self, item_id: Uuid) -> ApiResult<()>;

    /// Delete every row.
    async fn clear(&self) -> ApiResult<()>;
}

/// Apply one operation. Rows are addressed by id, so the row is looked up by product
/// first. Setting the quantity of a product the server does not have adds it; removing a
/// missing row succeeds.
pub(crate) async fn apply<M: CartMirror + ?Sized>(mirror: &M, op: MirrorOp) -> ApiResult<()> {
    match op {
        MirrorOp::SetQuantity {
            product_id,
            quantity,
        } => match find_row(mirror, product_id).await? {
            Some(item_id) => mirror.update_item(item_id, quantity).await.map(drop),
            None => mirror.add_item(product_id, quantity).await.map(drop),
        },
        MirrorOp::Remove { product_id } => match find_row(mirror, product_id).await? {
            Some(item_id) => mirror.remove_item(item_id).await,
            None => Ok(()),
        },
        MirrorOp::Clear => mirror.clear().await,
    }
}

async fn find_row<M: CartMirror + ?Sized>(mirror: &M, product_id: Uuid) -> ApiResult<Option<Uuid>> {
    let items = mirror.fetch_cart().await?;

    Ok(items
        .into_iter()
        .find(|item| item.product_id == product_id)
        .map(|item| item.id))
}
