//! Cart Handlers

pub(crate) mod clear;
pub(crate) mod get;
pub(crate) mod remove;
pub(crate) mod update;
pub(crate) mod upsert;

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use storefront_app::domain::{
        carts::models::{CartItem, CartItemUuid, CartProduct},
        catalog::models::ProductUuid,
    };

    pub(super) fn make_item(
        uuid: CartItemUuid,
        product_uuid: ProductUuid,
        price: u64,
        quantity: u32,
    ) -> CartItem {
        CartItem {
            uuid,
            product_uuid,
            quantity,
            product: CartProduct {
                name: "Mug".to_string(),
                slug: "mug".to_string(),
                price,
                images: vec!["https://cdn.example.com/mug.jpg".to_string()],
                stock: 10,
            },
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }
}
