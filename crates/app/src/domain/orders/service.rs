//! Orders service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use storefront_core::{money, pagination::PageRequest, pricing::PricingPolicy};
use tracing::{Span, info, warn};

use crate::{
    auth::Principal,
    database::Db,
    domain::orders::{
        errors::OrdersServiceError,
        models::{
            NewOrder, NewOrderRow, Order, OrderDetail, OrderPage, OrderQuery, OrderStatusUpdate,
            OrderUuid,
        },
        number::{fallback_order_number, format_order_number},
        placement::{merge_lines, validate_lines},
        repository::PgOrdersRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    repository: PgOrdersRepository,
    pricing: PricingPolicy,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db, pricing: PricingPolicy) -> Self {
        Self {
            db,
            repository: PgOrdersRepository::new(),
            pricing,
        }
    }

    /// Reserve an order number. A sequence failure falls back to a time-derived number.
    async fn next_order_number(&self) -> String {
        let now = Timestamp::now();

        match self.repository.next_order_sequence(self.db.pool()).await {
            Ok(sequence) => format_order_number(now, sequence),
            Err(error) => {
                warn!("order number sequence unavailable, using fallback: {error}");

                fallback_order_number(now)
            }
        }
    }

    async fn load_detail(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: Order,
    ) -> Result<OrderDetail, OrdersServiceError> {
        let items = self.repository.list_order_items(tx, order.uuid).await?;

        let shipping_address = self
            .repository
            .get_order_address(tx, order.shipping_address_uuid)
            .await?;

        let billing_address = self
            .repository
            .get_order_address(tx, order.billing_address_uuid)
            .await?;

        Ok(OrderDetail {
            order,
            items,
            shipping_address,
            billing_address,
        })
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    #[tracing::instrument(
        name = "orders.service.place_order",
        skip(self, order),
        fields(
            user_uuid = %principal.user,
            order_uuid = tracing::field::Empty,
            order_number = tracing::field::Empty,
            total = tracing::field::Empty
        ),
        err
    )]
    async fn place_order(
        &self,
        principal: Principal,
        order: NewOrder,
    ) -> Result<OrderDetail, OrdersServiceError> {
        let merged = merge_lines(&order.items)?;

        let order_number = self.next_order_number().await;
        let billing_address_uuid = order
            .billing_address_uuid
            .unwrap_or(order.shipping_address_uuid);

        let mut tx = self.db.begin_principal_transaction(principal).await?;

        for address in [order.shipping_address_uuid, billing_address_uuid] {
            if !self
                .repository
                .address_belongs_to_user(&mut tx, principal.user, address)
                .await?
            {
                return Err(OrdersServiceError::InvalidAddress);
            }
        }

        let product_uuids: Vec<_> = merged.keys().copied().collect();
        let locked = self
            .repository
            .lock_products(&mut tx, &product_uuids)
            .await?;
        let lines = validate_lines(&merged, locked)?;

        let totals = self.pricing.totals_for_lines(&lines)?;

        let uuid = OrderUuid::new();

        let created = self
            .repository
            .create_order(
                &mut tx,
                &NewOrderRow {
                    uuid,
                    user_uuid: principal.user,
                    order_number: &order_number,
                    payment_method: order.payment_method,
                    totals,
                    shipping_address_uuid: order.shipping_address_uuid,
                    billing_address_uuid,
                    notes: order
                        .notes
                        .as_deref()
                        .map(str::trim)
                        .filter(|notes| !notes.is_empty()),
                },
            )
            .await?;

        for line in &lines {
            let line_total = checked_line_total(line.price, line.quantity)?;

            self.repository
                .create_order_item(&mut tx, uuid, line, line_total)
                .await?;

            self.repository
                .decrement_stock(&mut tx, line.product_uuid, line.quantity)
                .await?;
        }

        self.repository
            .clear_user_cart(&mut tx, principal.user)
            .await?;

        let detail = self.load_detail(&mut tx, created).await?;

        tx.commit().await?;

        let span = Span::current();
        span.record("order_uuid", tracing::field::display(uuid));
        span.record("order_number", detail.order.order_number.as_str());
        span.record("total", detail.order.totals.total);

        info!(
            items = detail.items.len(),
            total = detail.order.totals.total,
            "placed order"
        );

        Ok(detail)
    }

    #[tracing::instrument(
        name = "orders.service.list_orders",
        skip(self),
        fields(user_uuid = %principal.user),
        err
    )]
    async fn list_orders(
        &self,
        principal: Principal,
        page: PageRequest,
    ) -> Result<OrderPage, OrdersServiceError> {
        let mut tx = self.db.begin_principal_transaction(principal).await?;

        let total = self
            .repository
            .count_user_orders(&mut tx, principal.user)
            .await?;

        let orders = self
            .repository
            .list_user_orders(&mut tx, principal.user, page)
            .await?;

        tx.commit().await?;

        Ok(OrderPage {
            orders,
            pagination: page.paginate(total),
        })
    }

    #[tracing::instrument(
        name = "orders.service.get_order",
        skip(self),
        fields(user_uuid = %principal.user, order_uuid = %order),
        err
    )]
    async fn get_order(
        &self,
        principal: Principal,
        order: OrderUuid,
    ) -> Result<OrderDetail, OrdersServiceError> {
        let mut tx = self.db.begin_principal_transaction(principal).await?;

        let found = self.repository.get_order(&mut tx, order).await?;
        let detail = self.load_detail(&mut tx, found).await?;

        tx.commit().await?;

        Ok(detail)
    }

    #[tracing::instrument(
        name = "orders.service.list_all_orders",
        skip(self, query),
        fields(status = ?query.status),
        err
    )]
    async fn list_all_orders(
        &self,
        principal: Principal,
        query: OrderQuery,
    ) -> Result<OrderPage, OrdersServiceError> {
        let mut tx = self.db.begin_principal_transaction(principal).await?;

        let total = self
            .repository
            .count_all_orders(&mut tx, query.status)
            .await?;

        let orders = self
            .repository
            .list_all_orders(&mut tx, query.status, query.page)
            .await?;

        tx.commit().await?;

        Ok(OrderPage {
            orders,
            pagination: query.page.paginate(total),
        })
    }

    #[tracing::instrument(
        name = "orders.service.update_order_status",
        skip(self, update),
        fields(
            order_uuid = %order,
            status = ?update.status,
            payment_status = ?update.payment_status,
            restocked = tracing::field::Empty
        ),
        err
    )]
    async fn update_order_status(
        &self,
        principal: Principal,
        order: OrderUuid,
        update: OrderStatusUpdate,
    ) -> Result<Order, OrdersServiceError> {
        if update.status.is_none() && update.payment_status.is_none() {
            return Err(OrdersServiceError::EmptyUpdate);
        }

        let mut tx = self.db.begin_principal_transaction(principal).await?;

        let current = self.repository.lock_order(&mut tx, order).await?;

        let status = update
            .status
            .map(|next| current.status.transition_to(next))
            .transpose()?
            .unwrap_or(current.status);

        let payment_status = update
            .payment_status
            .map(|next| current.payment_status.transition_to(next))
            .transpose()?
            .unwrap_or(current.payment_status);

        if status != current.status && status.restores_stock() {
            let restocked = self.repository.restore_stock(&mut tx, order).await?;

            Span::current().record("restocked", restocked);
        }

        let updated = self
            .repository
            .update_order_status(&mut tx, order, status, payment_status)
            .await?;

        tx.commit().await?;

        info!(
            order_number = %updated.order_number,
            status = %updated.status,
            payment_status = %updated.payment_status,
            "updated order status"
        );

        Ok(updated)
    }
}

fn checked_line_total(price: u64, quantity: u32) -> Result<u64, OrdersServiceError> {
    money::line_total(price, quantity).map_err(|error| OrdersServiceError::Pricing(error.into()))
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Place an order from submitted lines in one transaction.
    ///
    /// Lines are re-validated against locked product rows: the product must be orderable,
    /// the submitted unit price must equal the live price and stock must cover the
    /// quantity. Stock is decremented and the principal's persisted cart is cleared.
    async fn place_order(
        &self,
        principal: Principal,
        order: NewOrder,
    ) -> Result<OrderDetail, OrdersServiceError>;

    /// The principal's own orders, newest first.
    async fn list_orders(
        &self,
        principal: Principal,
        page: PageRequest,
    ) -> Result<OrderPage, OrdersServiceError>;

    /// One order with items and addresses. Orders of other users are not found.
    async fn get_order(
        &self,
        principal: Principal,
        order: OrderUuid,
    ) -> Result<OrderDetail, OrdersServiceError>;

    /// Every order visible to the principal, optionally filtered by status.
    async fn list_all_orders(
        &self,
        principal: Principal,
        query: OrderQuery,
    ) -> Result<OrderPage, OrdersServiceError>;

    /// Move the fulfilment and/or payment status. Cancelling returns stock.
    async fn update_order_status(
        &self,
        principal: Principal,
        order: OrderUuid,
        update: OrderStatusUpdate,
    ) -> Result<Order, OrdersServiceError>;
}
