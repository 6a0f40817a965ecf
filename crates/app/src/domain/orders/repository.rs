//! Orders Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{
    FromRow, PgPool, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar,
};
use storefront_core::{
    orders::{OrderStatus, PaymentStatus},
    pagination::PageRequest,
    pricing::OrderTotals,
};
use uuid::Uuid;

use crate::{
    auth::UserUuid,
    database::{amount_param, count_param, try_get_amount, try_get_count, try_get_total},
    domain::{
        addresses::models::{Address, AddressUuid},
        catalog::models::ProductUuid,
        orders::models::{
            LockedProduct, NewOrderRow, Order, OrderItem, OrderItemUuid, OrderUuid, ValidatedLine,
        },
    },
};

const NEXT_ORDER_NUMBER_SQL: &str = include_str!("sql/next_order_number.sql");
const ADDRESS_BELONGS_TO_USER_SQL: &str = include_str!("sql/address_belongs_to_user.sql");
const LOCK_PRODUCTS_SQL: &str = include_str!("sql/lock_products.sql");
const CREATE_ORDER_SQL: &str = include_str!("sql/create_order.sql");
const CREATE_ORDER_ITEM_SQL: &str = include_str!("sql/create_order_item.sql");
const DECREMENT_STOCK_SQL: &str = include_str!("sql/decrement_stock.sql");
const RESTORE_STOCK_SQL: &str = include_str!("sql/restore_stock.sql");
const CLEAR_USER_CART_SQL: &str = include_str!("sql/clear_user_cart.sql");
const GET_ORDER_SQL: &str = include_str!("sql/get_order.sql");
const LOCK_ORDER_SQL: &str = include_str!("sql/lock_order.sql");
const LIST_ORDER_ITEMS_SQL: &str = include_str!("sql/list_order_items.sql");
const GET_ORDER_ADDRESS_SQL: &str = include_str!("sql/get_order_address.sql");
const LIST_USER_ORDERS_SQL: &str = include_str!("sql/list_user_orders.sql");
const COUNT_USER_ORDERS_SQL: &str = include_str!("sql/count_user_orders.sql");
const LIST_ALL_ORDERS_SQL: &str = include_str!("sql/list_all_orders.sql");
const COUNT_ALL_ORDERS_SQL: &str = include_str!("sql/count_all_orders.sql");
const UPDATE_ORDER_STATUS_SQL: &str = include_str!("sql/update_order_status.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Next value of the order number sequence, read outside any order transaction.
    pub(crate) async fn next_order_sequence(&self, pool: &PgPool) -> Result<i64, sqlx::Error> {
        query_scalar(NEXT_ORDER_NUMBER_SQL).fetch_one(pool).await
    }

    pub(crate) async fn address_belongs_to_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        address: AddressUuid,
    ) -> Result<bool, sqlx::Error> {
        query_scalar(ADDRESS_BELONGS_TO_USER_SQL)
            .bind(address.into_uuid())
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Lock the given product rows in id order.
    pub(crate) async fn lock_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        products: &[ProductUuid],
    ) -> Result<Vec<LockedProduct>, sqlx::Error> {
        let uuids: Vec<Uuid> = products.iter().map(|product| product.into_uuid()).collect();

        query_as::<Postgres, LockedProduct>(LOCK_PRODUCTS_SQL)
            .bind(uuids)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &NewOrderRow<'_>,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(CREATE_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(order.user_uuid.into_uuid())
            .bind(order.order_number)
            .bind(order.payment_method.as_str())
            .bind(amount_param(order.totals.subtotal, "subtotal")?)
            .bind(amount_param(order.totals.tax, "tax")?)
            .bind(amount_param(order.totals.shipping, "shipping")?)
            .bind(amount_param(order.totals.total, "total")?)
            .bind(order.shipping_address_uuid.into_uuid())
            .bind(order.billing_address_uuid.into_uuid())
            .bind(order.notes)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_order_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        line: &ValidatedLine,
        total: u64,
    ) -> Result<(), sqlx::Error> {
        query(CREATE_ORDER_ITEM_SQL)
            .bind(OrderItemUuid::new().into_uuid())
            .bind(order.into_uuid())
            .bind(line.product_uuid.into_uuid())
            .bind(&line.product_name)
            .bind(line.product_image.as_deref())
            .bind(amount_param(line.price, "price")?)
            .bind(count_param(line.quantity, "quantity")?)
            .bind(amount_param(total, "total")?)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn decrement_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<(), sqlx::Error> {
        query(DECREMENT_STOCK_SQL)
            .bind(product.into_uuid())
            .bind(count_param(quantity, "quantity")?)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// Return every item's quantity to its product's stock.
    pub(crate) async fn restore_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(RESTORE_STOCK_SQL)
            .bind(order.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn clear_user_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(CLEAR_USER_CART_SQL)
            .bind(user.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn lock_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(LOCK_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_order_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Vec<OrderItem>, sqlx::Error> {
        query_as::<Postgres, OrderItem>(LIST_ORDER_ITEMS_SQL)
            .bind(order.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_order_address(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        address: Option<AddressUuid>,
    ) -> Result<Option<Address>, sqlx::Error> {
        let Some(address) = address else {
            return Ok(None);
        };

        query_as::<Postgres, Address>(GET_ORDER_ADDRESS_SQL)
            .bind(address.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn list_user_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        page: PageRequest,
    ) -> Result<Vec<Order>, sqlx::Error> {
        query_as::<Postgres, Order>(LIST_USER_ORDERS_SQL)
            .bind(user.into_uuid())
            .bind(page.limit())
            .bind(offset_param(page))
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn count_user_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<u64, sqlx::Error> {
        let row = query(COUNT_USER_ORDERS_SQL)
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        try_get_total(&row, "total")
    }

    pub(crate) async fn list_all_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        status: Option<OrderStatus>,
        page: PageRequest,
    ) -> Result<Vec<Order>, sqlx::Error> {
        query_as::<Postgres, Order>(LIST_ALL_ORDERS_SQL)
            .bind(status.map(OrderStatus::as_str))
            .bind(page.limit())
            .bind(offset_param(page))
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn count_all_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        status: Option<OrderStatus>,
    ) -> Result<u64, sqlx::Error> {
        let row = query(COUNT_ALL_ORDERS_SQL)
            .bind(status.map(OrderStatus::as_str))
            .fetch_one(&mut **tx)
            .await?;

        try_get_total(&row, "total")
    }

    pub(crate) async fn update_order_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        status: OrderStatus,
        payment_status: PaymentStatus,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(UPDATE_ORDER_STATUS_SQL)
            .bind(order.into_uuid())
            .bind(status.as_str())
            .bind(payment_status.as_str())
            .fetch_one(&mut **tx)
            .await
    }
}

fn offset_param(page: PageRequest) -> i64 {
    i64::try_from(page.offset()).unwrap_or(i64::MAX)
}

fn decode_error<E>(column: &str, error: E) -> sqlx::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(error),
    }
}

impl<'r> FromRow<'r, PgRow> for Order {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status: String = row.try_get("status")?;
        let payment_status: String = row.try_get("payment_status")?;
        let payment_method: String = row.try_get("payment_method")?;

        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            order_number: row.try_get("order_number")?,
            status: status.parse().map_err(|e| decode_error("status", e))?,
            payment_status: payment_status
                .parse()
                .map_err(|e| decode_error("payment_status", e))?,
            payment_method: payment_method
                .parse()
                .map_err(|e| decode_error("payment_method", e))?,
            totals: OrderTotals {
                subtotal: try_get_amount(row, "subtotal")?,
                tax: try_get_amount(row, "tax")?,
                shipping: try_get_amount(row, "shipping")?,
                total: try_get_amount(row, "total")?,
            },
            shipping_address_uuid: row
                .try_get::<Option<Uuid>, _>("shipping_address_uuid")?
                .map(AddressUuid::from_uuid),
            billing_address_uuid: row
                .try_get::<Option<Uuid>, _>("billing_address_uuid")?
                .map(AddressUuid::from_uuid),
            notes: row.try_get("notes")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for OrderItem {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderItemUuid::from_uuid(row.try_get("uuid")?),
            order_uuid: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            product_uuid: row
                .try_get::<Option<Uuid>, _>("product_uuid")?
                .map(ProductUuid::from_uuid),
            product_name: row.try_get("product_name")?,
            product_image: row.try_get("product_image")?,
            price: try_get_amount(row, "price")?,
            quantity: try_get_count(row, "quantity")?,
            total: try_get_amount(row, "total")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for LockedProduct {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            price: try_get_amount(row, "price")?,
            stock: try_get_count(row, "stock")?,
            images: row.try_get("images")?,
            is_orderable: row.try_get("is_orderable")?,
        })
    }
}
