//! Line merging and re-validation for order placement.

use std::collections::{BTreeMap, btree_map::Entry};

use crate::domain::{
    catalog::models::ProductUuid,
    orders::{
        errors::OrdersServiceError,
        models::{LockedProduct, NewOrderLine, ValidatedLine},
    },
};

/// Merge submitted lines by product, in product id order.
///
/// The id order is also the row lock order, so concurrent placements cannot deadlock.
pub(crate) fn merge_lines(
    lines: &[NewOrderLine],
) -> Result<BTreeMap<ProductUuid, NewOrderLine>, OrdersServiceError> {
    if lines.is_empty() {
        return Err(OrdersServiceError::EmptyOrder);
    }

    let mut merged = BTreeMap::new();

    for line in lines {
        if line.quantity == 0 {
            return Err(OrdersServiceError::InvalidQuantity);
        }

        match merged.entry(line.product_uuid) {
            Entry::Vacant(entry) => {
                entry.insert(*line);
            }
            Entry::Occupied(mut entry) => {
                let existing: &mut NewOrderLine = entry.get_mut();

                if existing.price != line.price {
                    return Err(OrdersServiceError::InvalidData);
                }

                existing.quantity = existing
                    .quantity
                    .checked_add(line.quantity)
                    .ok_or(OrdersServiceError::InvalidQuantity)?;
            }
        }
    }

    Ok(merged)
}

/// Check every merged line against its locked product row.
pub(crate) fn validate_lines(
    merged: &BTreeMap<ProductUuid, NewOrderLine>,
    locked: Vec<LockedProduct>,
) -> Result<Vec<ValidatedLine>, OrdersServiceError> {
    let mut locked: BTreeMap<ProductUuid, LockedProduct> = locked
        .into_iter()
        .map(|product| (product.uuid, product))
        .collect();

    merged
        .values()
        .map(|line| {
            let product = locked
                .remove(&line.product_uuid)
                .filter(|product| product.is_orderable)
                .ok_or(OrdersServiceError::ProductUnavailable {
                    product: line.product_uuid,
                })?;

            if product.price != line.price {
                return Err(OrdersServiceError::PriceChanged {
                    product: product.uuid,
                    submitted: line.price,
                    current: product.price,
                });
            }

            if product.stock < line.quantity {
                return Err(OrdersServiceError::InsufficientStock {
                    product: product.uuid,
                    available: product.stock,
                });
            }

            Ok(ValidatedLine {
                product_uuid: product.uuid,
                product_image: product.images.into_iter().next(),
                product_name: product.name,
                price: product.price,
                quantity: line.quantity,
            })
        })
        .collect()
}
