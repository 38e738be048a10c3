//! Offline-first product state
//!
//! `OfflineStore` applies every mutation to the local snapshot immediately,
//! regardless of connectivity, and records the mutation in the pending
//! queue when offline so the sync engine can replay it later. The local
//! view is never rolled back; a failed sync leaves it as the operative
//! truth until the next reconciliation.

mod queue;

pub use queue::PendingQueue;

use crate::cache::CacheStore;
use crate::connectivity::ConnectivityMonitor;
use crate::models::{OperationKind, PendingOperation, Product, ProductId, ProductPatch};

/// In-memory product state backed by a durable cache
pub struct OfflineStore<S> {
    cache: S,
    monitor: ConnectivityMonitor,
    products: Vec<Product>,
    queue: PendingQueue,
    last_synced_at: Option<i64>,
}

impl<S: CacheStore> OfflineStore<S> {
    /// Load the last persisted state; empty collections on first run
    pub fn open(cache: S, monitor: ConnectivityMonitor) -> Self {
        let snapshot = cache.load();
        tracing::debug!(
            "Loaded offline state: {} products, {} pending operations",
            snapshot.products.len(),
            snapshot.pending_ops.len()
        );

        Self {
            cache,
            monitor,
            products: snapshot.products,
            queue: PendingQueue::from_ops(snapshot.pending_ops),
            last_synced_at: snapshot.last_synced_at,
        }
    }

    /// Current local product list, most recently created first
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Operations awaiting remote confirmation, oldest first
    #[must_use]
    pub fn pending_ops(&self) -> &[PendingOperation] {
        self.queue.ops()
    }

    /// Last observed connectivity state
    #[must_use]
    pub fn is_online(&self) -> bool {
        self.monitor.is_online()
    }

    /// Shared connectivity handle
    #[must_use]
    pub const fn monitor(&self) -> &ConnectivityMonitor {
        &self.monitor
    }

    /// When the cache was last written (epoch ms), if ever
    #[must_use]
    pub const fn last_synced_at(&self) -> Option<i64> {
        self.last_synced_at
    }

    /// Make a new product visible immediately; queue a create when offline
    pub fn add_product_optimistic(&mut self, product: Product) {
        self.products.insert(0, product.clone());

        if !self.is_online() {
            self.queue.enqueue(PendingOperation::new(
                product.id,
                OperationKind::Create(product),
            ));
        }

        self.persist();
    }

    /// Merge a partial update into the matching product; queue when offline
    ///
    /// A missing local id is a no-op on the snapshot but the operation is
    /// still queued, mirroring the remote patch semantics (patching an
    /// absent row changes nothing).
    pub fn update_product_optimistic(&mut self, id: ProductId, patch: ProductPatch) {
        if let Some(product) = self.products.iter_mut().find(|product| product.id == id) {
            patch.apply(product);
        }

        if !self.is_online() {
            self.queue
                .enqueue(PendingOperation::new(id, OperationKind::Update(patch)));
        }

        self.persist();
    }

    /// Remove the matching product; queue a delete when offline
    pub fn delete_product_optimistic(&mut self, id: ProductId) {
        self.products.retain(|product| product.id != id);

        if !self.is_online() {
            self.queue
                .enqueue(PendingOperation::new(id, OperationKind::Delete));
        }

        self.persist();
    }

    /// Overwrite the snapshot wholesale with remote truth
    ///
    /// The reconciliation point after a successful sync; resolves any
    /// temporary-vs-server id mismatch by trusting the fetched list.
    pub fn replace_products(&mut self, products: Vec<Product>) {
        self.products = products;
        self.persist();
    }

    /// Empty the pending queue; called only after a confirmed full drain
    pub fn clear_pending_operations(&mut self) {
        self.queue.clear();
        self.persist();
    }

    /// Best-effort persistence: the optimistic mutation already succeeded
    /// from the caller's perspective, so a write failure is only logged.
    fn persist(&mut self) {
        if let Err(error) = self.cache.save(&self.products, self.queue.ops()) {
            tracing::warn!("Failed to persist offline state: {error}");
        }
    }
}
