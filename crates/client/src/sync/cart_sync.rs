//! Cart store plus outbox, linked to one account at a time.

use backon::Retryable;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    api::ApiError,
    store::{CartLine, CartStore},
};

use super::{CartMirror, MirrorOp, Outbox, OutboxStore, RetryPolicy, SyncError, mirror};

/// Outcome of one [`CartSync::flush`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Operations the server accepted.
    pub applied: usize,

    /// Operations the server rejected permanently.
    pub dropped: usize,

    /// Operations still queued.
    pub pending: usize,
}

/// Outcome of [`CartSync::hydrate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hydration {
    /// No session; the local cart is kept.
    SignedOut,

    /// Queued operations could not be delivered, so the server cart is stale and the
    /// local cart is kept.
    Deferred {
        /// Operations still queued.
        pending: usize,
    },

    /// The local cart now holds the server cart, merged with the guest cart on the first
    /// hydration after sign-in.
    Hydrated {
        /// Lines in the local cart afterwards.
        lines: usize,
    },

    /// The server cart could not be fetched; the local cart is kept.
    FetchFailed,
}

/// Applies cart mutations locally and mirrors them to the server cart.
///
/// Mutations are mirrored only once the local cart is linked to the signed-in account,
/// which [`CartSync::hydrate`] does. Until then they stay local and are merged into the
/// server cart by that hydration.
#[derive(Debug)]
pub struct CartSync<M, S> {
    store: CartStore,
    outbox: Outbox<S>,
    mirror: M,
    retry: RetryPolicy,
    linked: Option<Uuid>,
}

impl<M: CartMirror, S: OutboxStore> CartSync<M, S> {
    /// A guest cart over `store`, resuming any operations left in `outbox_store`.
    ///
    /// # Errors
    ///
    /// Returns an error when the outbox store cannot be read.
    pub fn new(store: CartStore, mirror: M, outbox_store: S) -> Result<Self, SyncError> {
        Ok(Self {
            store,
            outbox: Outbox::open(outbox_store)?,
            mirror,
            retry: RetryPolicy::default(),
            linked: None,
        })
    }

    /// Replace the default [`RetryPolicy`].
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// The local cart.
    #[must_use]
    pub const fn store(&self) -> &CartStore {
        &self.store
    }

    /// The server cart.
    #[must_use]
    pub const fn mirror(&self) -> &M {
        &self.mirror
    }

    /// Swap credentials on the mirror, e.g. after sign-in. Call [`CartSync::hydrate`]
    /// afterwards.
    pub const fn mirror_mut(&mut self) -> &mut M {
        &mut self.mirror
    }

    /// Operations waiting for the server.
    #[must_use]
    pub const fn outbox(&self) -> &Outbox<S> {
        &self.outbox
    }

    /// Account whose server cart the local cart mirrors.
    #[must_use]
    pub fn linked_account(&self) -> Option<Uuid> {
        self.linked.filter(|linked| self.mirror.account() == Some(*linked))
    }

    /// Add a line, summing quantities for a product already in the cart.
    ///
    /// # Errors
    ///
    /// Returns an error when the operation cannot be queued. The local cart has already
    /// changed by then.
    pub fn add_item(&mut self, line: CartLine) -> Result<(), SyncError> {
        let product_id = line.product_id;

        self.store.add_item(line);
        self.enqueue_line(product_id)
    }

    /// Returns whether the local cart changed.
    ///
    /// # Errors
    ///
    /// Returns an error when the operation cannot be queued.
    pub fn remove_item(&mut self, product_id: Uuid) -> Result<bool, SyncError> {
        if !self.store.remove_item(product_id) {
            return Ok(false);
        }

        self.enqueue(MirrorOp::Remove { product_id })?;

        Ok(true)
    }

    /// Returns whether the local cart changed.
    ///
    /// # Errors
    ///
    /// Returns an error when the operation cannot be queued.
    pub fn set_quantity(&mut self, product_id: Uuid, quantity: i64) -> Result<bool, SyncError> {
        if !self.store.set_quantity(product_id, quantity) {
            return Ok(false);
        }

        self.enqueue_line(product_id)?;

        Ok(true)
    }

    /// Empty the cart. Operations still queued are superseded by the clear.
    ///
    /// # Errors
    ///
    /// Returns an error when the operation cannot be queued.
    pub fn clear(&mut self) -> Result<(), SyncError> {
        self.store.clear();

        if self.linked_account().is_none() {
            return Ok(());
        }

        self.outbox.clear()?;
        self.outbox.push(MirrorOp::Clear)
    }

    /// See [`CartStore::toggle_drawer`].
    pub fn toggle_drawer(&mut self) {
        self.store.toggle_drawer();
    }

    /// See [`CartStore::open`].
    pub fn open(&mut self) {
        self.store.open();
    }

    /// See [`CartStore::close`].
    pub fn close(&mut self) {
        self.store.close();
    }

    /// Drop the local cart and every queued operation, as after an order has been placed.
    ///
    /// # Errors
    ///
    /// Returns an error when the outbox store cannot be written.
    pub fn discard_local(&mut self) -> Result<(), SyncError> {
        self.store.clear();
        self.outbox.clear()
    }

    /// End the session. Queued operations get one last flush; whatever is still pending
    /// afterwards is discarded along with the local cart, and the mirror forgets its
    /// credentials. The server cart is kept for the next sign-in.
    ///
    /// # Errors
    ///
    /// Returns an error when the outbox store cannot be written.
    pub async fn sign_out(&mut self) -> Result<FlushReport, SyncError> {
        let report = self.flush().await?;

        if report.pending > 0 {
            warn!(pending = report.pending, "discarding undelivered cart operations on sign-out");
        }

        self.store.clear();
        self.outbox.claim(None)?;
        self.linked = None;
        self.mirror.sign_out();

        info!("cart signed out");

        Ok(report)
    }

    /// Deliver queued operations in order.
    ///
    /// Operations queued for a different account than the signed-in one are discarded
    /// first. Transient failures are retried per the [`RetryPolicy`]. An operation the
    /// server rejects permanently is dropped. An operation that still fails after its last
    /// attempt stays at the head of the queue and ends the flush.
    ///
    /// # Errors
    ///
    /// Returns an error when the outbox store cannot be written.
    pub async fn flush(&mut self) -> Result<FlushReport, SyncError> {
        let mut report = FlushReport::default();

        let Some(account) = self.mirror.account() else {
            report.pending = self.outbox.len();
            return Ok(report);
        };

        let discarded = self.outbox.claim(Some(account))?;

        if discarded > 0 {
            warn!(discarded, "discarded cart operations queued for another account");
        }

        while let Some(op) = self.outbox.front() {
            let target = &self.mirror;

            let result = (|| async { mirror::apply(target, op).await })
                .retry(self.retry.backoff())
                .when(ApiError::is_transient)
                .notify(|error, delay| warn!(?op, ?delay, "retrying cart sync: {error}"))
                .await;

            match result {
                Ok(()) => {
                    self.outbox.pop_front()?;
                    report.applied += 1;
                }
                Err(error) if error.is_permanent() => {
                    warn!(?op, "server rejected cart operation, dropping it: {error}");

                    self.outbox.pop_front()?;
                    report.dropped += 1;
                }
                Err(error) => {
                    warn!(?op, "cart sync stopped: {error}");
                    break;
                }
            }
        }

        report.pending = self.outbox.len();

        if report.applied > 0 || report.dropped > 0 {
            info!(
                applied = report.applied,
                dropped = report.dropped,
                pending = report.pending,
                "cart sync flushed"
            );
        }

        Ok(report)
    }

    /// Load the server cart into the local cart and link the two.
    ///
    /// Queued operations are flushed first. While any remain the server cart does not
    /// reflect local changes, so hydration is skipped. A guest cart is merged into the
    /// server cart, summing quantities per product, and the merged lines are queued back
    /// to the server. A cart linked to another account is replaced.
    ///
    /// # Errors
    ///
    /// Returns an error when the outbox store cannot be written.
    pub async fn hydrate(&mut self) -> Result<Hydration, SyncError> {
        let Some(account) = self.mirror.account() else {
            return Ok(Hydration::SignedOut);
        };

        let report = self.flush().await?;

        if report.pending > 0 {
            warn!(pending = report.pending, "cart hydration deferred");
            return Ok(Hydration::Deferred {
                pending: report.pending,
            });
        }

        let target = &self.mirror;

        let fetched = (|| async { target.fetch_cart().await })
            .retry(self.retry.backoff())
            .when(ApiError::is_transient)
            .await;

        let items = match fetched {
            Ok(items) => items,
            Err(error) => {
                warn!("failed to fetch server cart: {error}");
                return Ok(Hydration::FetchFailed);
            }
        };

        let server: Vec<CartLine> = items.into_iter().map(CartLine::from).collect();

        if self.linked.is_some() {
            self.store.replace_all(server);
            self.linked = Some(account);
        } else {
            self.merge_guest_cart(account, server).await?;
        }

        Ok(Hydration::Hydrated {
            lines: self.store.snapshot().lines.len(),
        })
    }

    async fn merge_guest_cart(&mut self, account: Uuid, server: Vec<CartLine>) -> Result<(), SyncError> {
        let guest = self.store.snapshot().lines;

        self.store.replace_all(server.into_iter().chain(guest.iter().cloned()).collect());
        self.linked = Some(account);

        if guest.is_empty() {
            return Ok(());
        }

        for line in &guest {
            self.enqueue_line(line.product_id)?;
        }

        let report = self.flush().await?;

        info!(
            merged = guest.len(),
            pending = report.pending,
            "guest cart merged into account cart"
        );

        Ok(())
    }

    /// Queue the product's current local quantity, or its removal.
    fn enqueue_line(&mut self, product_id: Uuid) -> Result<(), SyncError> {
        let op = match self.store.snapshot().line(product_id) {
            Some(line) => MirrorOp::SetQuantity {
                product_id,
                quantity: line.quantity,
            },
            None => MirrorOp::Remove { product_id },
        };

        self.enqueue(op)
    }

    fn enqueue(&mut self, op: MirrorOp) -> Result<(), SyncError> {
        if self.linked_account().is_some() {
            self.outbox.push(op)?;
        }

        Ok(())
    }
}
