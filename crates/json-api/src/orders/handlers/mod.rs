//! Order Handlers

pub(crate) mod admin_index;
pub(crate) mod create;
pub(crate) mod get;
pub(crate) mod index;
pub(crate) mod update_status;

#[cfg(test)]
pub(crate) mod tests {
    use storefront_app::domain::{
        catalog::models::ProductUuid,
        orders::models::{OrderDetail, OrderItem, OrderItemUuid, OrderUuid},
    };
    use storefront_core::orders::OrderStatus;

    use crate::test_helpers::make_order;

    pub(crate) fn make_detail(uuid: OrderUuid, status: OrderStatus) -> OrderDetail {
        OrderDetail {
            order: make_order(uuid, status),
            items: vec![
                OrderItem {
                    uuid: OrderItemUuid::new(),
                    order_uuid: uuid,
                    product_uuid: Some(ProductUuid::new()),
                    product_name: "Kettle".to_string(),
                    product_image: None,
                    price: 100_000,
                    quantity: 2,
                    total: 200_000,
                },
                OrderItem {
                    uuid: OrderItemUuid::new(),
                    order_uuid: uuid,
                    product_uuid: Some(ProductUuid::new()),
                    product_name: "Teapot".to_string(),
                    product_image: None,
                    price: 50_000,
                    quantity: 1,
                    total: 50_000,
                },
            ],
            shipping_address: None,
            billing_address: None,
        }
    }
}
