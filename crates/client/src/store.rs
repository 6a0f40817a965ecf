//! Cart Store
//!
//! The in-session view of the cart. Every mutation replaces the published snapshot in one
//! step, so subscribers never observe a half-applied change. Totals are derived from the
//! lines on every call and never stored.

use serde::{Deserialize, Serialize};
use storefront_core::pricing::{self, PricedLine, PricingError};
use tokio::sync::watch;
use uuid::Uuid;

/// One product in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product the line is for; unique within a cart.
    pub product_id: Uuid,

    /// Product name at the time it was added.
    pub name: String,

    /// URL slug of the product page.
    pub slug: String,

    /// Unit price captured when the product was added.
    pub unit_price: u64,

    /// First product image, if any.
    pub image_url: Option<String>,

    /// Units in the cart, at least one.
    pub quantity: u32,

    /// Stock available when the product was added; the UI keeps `quantity` at or below it.
    pub stock: u32,
}

impl PricedLine for CartLine {
    fn unit_price(&self) -> u64 {
        self.unit_price
    }

    fn quantity(&self) -> u32 {
        self.quantity
    }
}

/// Cart contents plus drawer visibility.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    /// Lines in the order products were first added.
    pub lines: Vec<CartLine>,

    /// Whether the cart drawer is shown.
    pub drawer_open: bool,
}

impl CartSnapshot {
    /// `Σ unit_price × quantity`.
    ///
    /// # Errors
    ///
    /// Returns an error when the sum overflows.
    pub fn total(&self) -> Result<u64, PricingError> {
        pricing::subtotal(&self.lines)
    }

    /// `Σ quantity`.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The product's line, if it is in the cart.
    #[must_use]
    pub fn line(&self, product_id: Uuid) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product_id == product_id)
    }
}

/// Single-writer cart state with a snapshot channel for observers.
#[derive(Debug)]
pub struct CartStore {
    state: watch::Sender<CartSnapshot>,
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CartStore {
    /// An empty cart with the drawer closed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: watch::Sender::new(CartSnapshot::default()),
        }
    }

    /// Receive a full snapshot after every mutation.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartSnapshot> {
        self.state.subscribe()
    }

    /// The current state.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        self.state.borrow().clone()
    }

    /// Add a line, summing quantities when the product is already in the cart. Opens the
    /// drawer.
    pub fn add_item(&mut self, item: CartLine) {
        self.state.send_modify(|cart| {
            merge_line(&mut cart.lines, item);
            cart.drawer_open = true;
        });
    }

    /// Remove the product's line. Returns whether a line was removed.
    pub fn remove_item(&mut self, product_id: Uuid) -> bool {
        self.state.send_if_modified(|cart| {
            let before = cart.lines.len();
            cart.lines.retain(|line| line.product_id != product_id);

            cart.lines.len() != before
        })
    }

    /// Overwrite a line's quantity. Zero or less removes the line; an absent product is
    /// left absent. Returns whether the cart changed.
    pub fn set_quantity(&mut self, product_id: Uuid, quantity: i64) -> bool {
        let Ok(quantity @ 1..) = u32::try_from(quantity.min(i64::from(u32::MAX))) else {
            return self.remove_item(product_id);
        };

        self.state.send_if_modified(|cart| {
            match cart.lines.iter_mut().find(|line| line.product_id == product_id) {
                Some(line) if line.quantity != quantity => {
                    line.quantity = quantity;
                    true
                }
                _ => false,
            }
        })
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.state.send_modify(|cart| cart.lines.clear());
    }

    /// Replace every line, as when hydrating from the server cart. Duplicate products are
    /// merged.
    pub fn replace_all(&mut self, items: Vec<CartLine>) {
        let mut lines = Vec::with_capacity(items.len());

        for item in items {
            merge_line(&mut lines, item);
        }

        self.state.send_modify(|cart| cart.lines = lines);
    }

    /// Flip drawer visibility.
    pub fn toggle_drawer(&mut self) {
        self.state.send_modify(|cart| cart.drawer_open = !cart.drawer_open);
    }

    /// Show the drawer.
    pub fn open(&mut self) {
        self.state.send_if_modified(|cart| !std::mem::replace(&mut cart.drawer_open, true));
    }

    /// Hide the drawer.
    pub fn close(&mut self) {
        self.state.send_if_modified(|cart| std::mem::replace(&mut cart.drawer_open, false));
    }

    /// See [`CartSnapshot::total`].
    ///
    /// # Errors
    ///
    /// Returns an error when the sum overflows.
    pub fn total(&self) -> Result<u64, PricingError> {
        self.state.borrow().total()
    }

    /// See [`CartSnapshot::item_count`].
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.state.borrow().item_count()
    }

    /// See [`CartSnapshot::is_empty`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.borrow().is_empty()
    }
}

fn merge_line(lines: &mut Vec<CartLine>, item: CartLine) {
    match lines.iter_mut().find(|line| line.product_id == item.product_id) {
        Some(line) => line.quantity = line.quantity.saturating_add(item.quantity),
        None => lines.push(item),
    }
}
