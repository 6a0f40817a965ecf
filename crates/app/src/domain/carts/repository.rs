//! Cart Items Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::{
    auth::UserUuid,
    database::{count_param, try_get_amount, try_get_count},
    domain::{
        carts::models::{CartItem, CartItemUuid, CartProduct, NewCartItem},
        catalog::models::ProductUuid,
    },
};

const LIST_CART_ITEMS_SQL: &str = include_str!("sql/list_cart_items.sql");
const GET_CART_ITEM_SQL: &str = include_str!("sql/get_cart_item.sql");
const GET_AVAILABLE_STOCK_SQL: &str = include_str!("sql/get_available_stock.sql");
const UPSERT_CART_ITEM_SQL: &str = include_str!("sql/upsert_cart_item.sql");
const UPDATE_CART_ITEM_QUANTITY_SQL: &str = include_str!("sql/update_cart_item_quantity.sql");
const DELETE_CART_ITEM_SQL: &str = include_str!("sql/delete_cart_item.sql");
const CLEAR_CART_SQL: &str = include_str!("sql/clear_cart.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartItemsRepository;

impl PgCartItemsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_cart_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<CartItem>, sqlx::Error> {
        query_as::<Postgres, CartItem>(LIST_CART_ITEMS_SQL)
            .bind(user.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_cart_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        item: CartItemUuid,
    ) -> Result<CartItem, sqlx::Error> {
        query_as::<Postgres, CartItem>(GET_CART_ITEM_SQL)
            .bind(item.into_uuid())
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Stock of an orderable product, locked against concurrent stock changes.
    pub(crate) async fn get_available_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<Option<u32>, sqlx::Error> {
        let stock: Option<i32> = query_scalar(GET_AVAILABLE_STOCK_SQL)
            .bind(product.into_uuid())
            .fetch_optional(&mut **tx)
            .await?;

        stock
            .map(|stock| {
                u32::try_from(stock).map_err(|e| sqlx::Error::ColumnDecode {
                    index: "stock".to_string(),
                    source: Box::new(e),
                })
            })
            .transpose()
    }

    /// Insert a line or add to the existing line's quantity.
    ///
    /// Returns `None` when the merged quantity would exceed `stock`.
    pub(crate) async fn upsert_cart_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        item: NewCartItem,
        stock: u32,
    ) -> Result<Option<CartItemUuid>, sqlx::Error> {
        let uuid: Option<Uuid> = query_scalar(UPSERT_CART_ITEM_SQL)
            .bind(CartItemUuid::new().into_uuid())
            .bind(user.into_uuid())
            .bind(item.product_uuid.into_uuid())
            .bind(count_param(item.quantity, "quantity")?)
            .bind(count_param(stock, "stock")?)
            .fetch_optional(&mut **tx)
            .await?;

        Ok(uuid.map(CartItemUuid::from_uuid))
    }

    pub(crate) async fn update_quantity(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        item: CartItemUuid,
        quantity: u32,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(UPDATE_CART_ITEM_QUANTITY_SQL)
            .bind(item.into_uuid())
            .bind(user.into_uuid())
            .bind(count_param(quantity, "quantity")?)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn delete_cart_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        item: CartItemUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_CART_ITEM_SQL)
            .bind(item.into_uuid())
            .bind(user.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn clear_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(CLEAR_CART_SQL)
            .bind(user.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for CartItem {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CartItemUuid::from_uuid(row.try_get("uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            quantity: try_get_count(row, "quantity")?,
            product: CartProduct {
                name: row.try_get("product_name")?,
                slug: row.try_get("product_slug")?,
                price: try_get_amount(row, "product_price")?,
                images: row.try_get("product_images")?,
                stock: try_get_count(row, "product_stock")?,
            },
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
