//! Reconciliation of local optimistic state with the remote store
//!
//! One engine exists per running client, injected where it is needed so a
//! test can substitute a fake remote. A drain cycle replays the pending
//! queue strictly sequentially in timestamp order; only a fully successful
//! drain clears the queue and triggers the refresh that overwrites the
//! local snapshot with remote truth.

use crate::cache::CacheStore;
use crate::connectivity::NetworkStatus;
use crate::error::Result;
use crate::models::{OperationKind, PendingOperation, Product};
use crate::offline::OfflineStore;
use crate::remote::RemoteStore;

/// Where the engine is in its drain/refresh cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Draining,
    Refreshing,
}

/// Result of one sync cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Offline or nothing queued; no remote traffic
    Skipped,
    /// Drain halted on a remote write error; queue left intact for retry
    Failed,
    /// Every queued operation confirmed and the snapshot refreshed
    Completed { applied: usize },
}

impl SyncOutcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// Merge local optimistic state with fetched remote truth
///
/// Current policy: remote wins wholesale. Kept as a standalone pure
/// function so a smarter conflict policy is a drop-in replacement.
#[must_use]
pub fn reconcile(_local: &[Product], remote: Vec<Product>) -> Vec<Product> {
    remote
}

/// Replays pending mutations and refreshes the local snapshot
pub struct SyncEngine<R> {
    remote: R,
    state: SyncState,
}

impl<R: RemoteStore> SyncEngine<R> {
    #[must_use]
    pub const fn new(remote: R) -> Self {
        Self {
            remote,
            state: SyncState::Idle,
        }
    }

    /// Current position in the drain/refresh cycle
    #[must_use]
    pub const fn state(&self) -> SyncState {
        self.state
    }

    /// Apply queued operations against the remote store, oldest first
    ///
    /// Operations are stable-sorted by logical timestamp and applied one
    /// at a time; the first error halts the batch. Writes already applied
    /// stay committed remotely, so the caller must not clear the queue
    /// unless every operation succeeded.
    pub async fn sync_pending_operations(&self, ops: &[PendingOperation]) -> Result<usize> {
        let mut ordered: Vec<PendingOperation> = ops.to_vec();
        ordered.sort_by_key(|op| op.timestamp);

        for op in &ordered {
            tracing::debug!("Replaying {} for product {}", op.kind.name(), op.product_id);
            match &op.kind {
                OperationKind::Create(product) => self.remote.upsert_product(product).await?,
                OperationKind::Update(patch) => {
                    self.remote.patch_product(op.product_id, patch).await?;
                }
                OperationKind::Delete => self.remote.delete_product(op.product_id).await?,
            }
        }

        tracing::info!("Replayed {} pending operation(s)", ordered.len());
        Ok(ordered.len())
    }

    /// Authoritative current product collection, newest first
    pub async fn fetch_latest_products(&self) -> Result<Vec<Product>> {
        self.remote.list_products().await
    }

    /// Run one full sync cycle against the given store
    ///
    /// Skips without remote traffic when offline or when nothing is
    /// queued. A drain failure is logged and reported as
    /// `SyncOutcome::Failed` with the queue untouched. A refresh failure
    /// after a successful drain propagates as an error; the caller keeps
    /// showing cached data.
    pub async fn run<S: CacheStore>(
        &mut self,
        store: &mut OfflineStore<S>,
    ) -> Result<SyncOutcome> {
        if !store.is_online() {
            tracing::debug!("Sync skipped: offline");
            return Ok(SyncOutcome::Skipped);
        }

        let pending: Vec<PendingOperation> = store.pending_ops().to_vec();
        if pending.is_empty() {
            tracing::debug!("Sync skipped: queue empty");
            return Ok(SyncOutcome::Skipped);
        }

        self.state = SyncState::Draining;
        let applied = match self.sync_pending_operations(&pending).await {
            Ok(applied) => applied,
            Err(error) => {
                tracing::warn!("Sync failed, queue preserved for retry: {error}");
                self.state = SyncState::Idle;
                return Ok(SyncOutcome::Failed);
            }
        };

        store.clear_pending_operations();

        self.state = SyncState::Refreshing;
        let remote = match self.fetch_latest_products().await {
            Ok(remote) => remote,
            Err(error) => {
                self.state = SyncState::Idle;
                return Err(error);
            }
        };

        let merged = reconcile(store.products(), remote);
        store.replace_products(merged);
        self.state = SyncState::Idle;

        Ok(SyncOutcome::Completed { applied })
    }

    /// Wait for the next transition to online, then run one sync cycle
    ///
    /// Long-running frontends park this on their runtime so regained
    /// connectivity drains the queue without user action.
    pub async fn run_on_reconnect<S: CacheStore>(
        &mut self,
        store: &mut OfflineStore<S>,
    ) -> Result<SyncOutcome> {
        let mut receiver = store.monitor().subscribe();

        while *receiver.borrow_and_update() != NetworkStatus::Online {
            if receiver.changed().await.is_err() {
                // Every monitor handle is gone; no transition can arrive
                return Ok(SyncOutcome::Skipped);
            }
        }

        self.run(store).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCacheStore;
    use crate::connectivity::{ConnectivityMonitor, NetworkStatus};
    use crate::error::Error;
    use crate::models::{ProductId, ProductPatch};
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    /// In-memory stand-in for the hosted store
    ///
    /// Records every write so tests can assert replay order, and can be
    /// told to fail the nth write to exercise mid-batch failures.
    #[derive(Default)]
    struct FakeRemote {
        inner: Mutex<FakeRemoteInner>,
    }

    #[derive(Default)]
    struct FakeRemoteInner {
        rows: Vec<Product>,
        writes: Vec<String>,
        fail_on_write: Option<usize>,
        fail_list: bool,
    }

    impl FakeRemote {
        fn with_rows(rows: Vec<Product>) -> Self {
            let remote = Self::default();
            remote.inner.lock().unwrap().rows = rows;
            remote
        }

        fn fail_on_write(self, nth: usize) -> Self {
            self.inner.lock().unwrap().fail_on_write = Some(nth);
            self
        }

        fn fail_list(self) -> Self {
            self.inner.lock().unwrap().fail_list = true;
            self
        }

        fn rows(&self) -> Vec<Product> {
            self.inner.lock().unwrap().rows.clone()
        }

        fn writes(&self) -> Vec<String> {
            self.inner.lock().unwrap().writes.clone()
        }

        fn record_write(inner: &mut FakeRemoteInner, label: String) -> Result<()> {
            if inner.fail_on_write == Some(inner.writes.len()) {
                return Err(Error::Api("injected write failure".to_string()));
            }
            inner.writes.push(label);
            Ok(())
        }
    }

    impl RemoteStore for &FakeRemote {
        async fn upsert_product(&self, product: &Product) -> Result<()> {
            let mut inner = self.inner.lock().unwrap();
            FakeRemote::record_write(&mut inner, format!("create:{}", product.id))?;

            if let Some(existing) = inner.rows.iter_mut().find(|row| row.id == product.id) {
                *existing = product.clone();
            } else {
                inner.rows.push(product.clone());
            }
            Ok(())
        }

        async fn patch_product(&self, id: ProductId, patch: &ProductPatch) -> Result<()> {
            let mut inner = self.inner.lock().unwrap();
            FakeRemote::record_write(&mut inner, format!("update:{id}"))?;

            if let Some(existing) = inner.rows.iter_mut().find(|row| row.id == id) {
                patch.apply(existing);
            }
            Ok(())
        }

        async fn delete_product(&self, id: ProductId) -> Result<()> {
            let mut inner = self.inner.lock().unwrap();
            FakeRemote::record_write(&mut inner, format!("delete:{id}"))?;

            // Absent rows are a no-op, matching the REST backend
            inner.rows.retain(|row| row.id != id);
            Ok(())
        }

        async fn list_products(&self) -> Result<Vec<Product>> {
            let inner = self.inner.lock().unwrap();
            if inner.fail_list {
                return Err(Error::Api("injected fetch failure".to_string()));
            }

            let mut rows = inner.rows.clone();
            rows.sort_by_key(|row| std::cmp::Reverse(row.created_at));
            Ok(rows)
        }
    }

    fn offline_store() -> OfflineStore<MemoryCacheStore> {
        OfflineStore::open(
            MemoryCacheStore::new(),
            ConnectivityMonitor::new(NetworkStatus::Offline),
        )
    }

    #[test]
    fn test_reconcile_remote_wins() {
        let local = vec![Product::new("Local", 1.0, 2.0, 1.5)];
        let remote = vec![Product::new("Remote", 3.0, 4.0, 3.5)];

        let merged = reconcile(&local, remote.clone());
        assert_eq!(merged, remote);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_replay_is_in_timestamp_order_regardless_of_insertion() {
        let id = ProductId::new();
        let late = PendingOperation {
            product_id: id,
            kind: OperationKind::Update(ProductPatch {
                selling_price: Some(10.0),
                ..ProductPatch::default()
            }),
            timestamp: 10,
        };
        let early = PendingOperation {
            product_id: id,
            kind: OperationKind::Update(ProductPatch {
                selling_price: Some(5.0),
                ..ProductPatch::default()
            }),
            timestamp: 5,
        };

        let mut row = Product::new("Ordered", 1.0, 2.0, 1.5);
        row.id = id;
        let remote = FakeRemote::with_rows(vec![row]);
        let engine = SyncEngine::new(&remote);

        // Enqueued out of chronological order
        engine
            .sync_pending_operations(&[late, early])
            .await
            .unwrap();

        assert_eq!(remote.writes(), vec![format!("update:{id}"), format!("update:{id}")]);
        // ts=5 applied first, ts=10 last: final value comes from ts=10
        assert_eq!(remote.rows()[0].selling_price, 10.0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_replaying_same_batch_twice_does_not_duplicate() {
        let product = Product::new("Idempotent", 5.0, 8.0, 7.0);
        let ops = vec![PendingOperation::new(
            product.id,
            OperationKind::Create(product),
        )];

        let remote = FakeRemote::default();
        let engine = SyncEngine::new(&remote);

        engine.sync_pending_operations(&ops).await.unwrap();
        engine.sync_pending_operations(&ops).await.unwrap();

        assert_eq!(remote.rows().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_delete_of_remotely_absent_product_succeeds() {
        let ops = vec![PendingOperation::new(ProductId::new(), OperationKind::Delete)];

        let remote = FakeRemote::default();
        let engine = SyncEngine::new(&remote);

        let applied = engine.sync_pending_operations(&ops).await.unwrap();
        assert_eq!(applied, 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_run_skips_when_offline() {
        let mut store = offline_store();
        store.add_product_optimistic(Product::new("Queued", 1.0, 2.0, 1.5));

        let remote = FakeRemote::default();
        let mut engine = SyncEngine::new(&remote);

        let outcome = engine.run(&mut store).await.unwrap();
        assert_eq!(outcome, SyncOutcome::Skipped);
        assert!(remote.writes().is_empty());
        assert_eq!(store.pending_ops().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_run_skips_when_queue_empty() {
        let mut store = OfflineStore::open(
            MemoryCacheStore::new(),
            ConnectivityMonitor::new(NetworkStatus::Online),
        );

        let remote = FakeRemote::default();
        let mut engine = SyncEngine::new(&remote);

        let outcome = engine.run(&mut store).await.unwrap();
        assert_eq!(outcome, SyncOutcome::Skipped);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_offline_create_then_reconnect_syncs_and_clears_queue() {
        // Scenario: create while offline, go online, sync
        let mut store = offline_store();
        let product = Product::new("LED Bulb", 45.0, 65.0, 55.0);
        store.add_product_optimistic(product.clone());
        assert_eq!(store.pending_ops().len(), 1);

        store.monitor().set_online();

        let remote = FakeRemote::default();
        let mut engine = SyncEngine::new(&remote);
        let outcome = engine.run(&mut store).await.unwrap();

        assert_eq!(outcome, SyncOutcome::Completed { applied: 1 });
        assert!(store.pending_ops().is_empty());
        assert_eq!(store.products().len(), 1);
        assert_eq!(store.products()[0].product_name, "LED Bulb");
        assert_eq!(store.products()[0].cost_price, 45.0);
        assert_eq!(engine.state(), SyncState::Idle);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_mid_batch_failure_preserves_whole_queue() {
        // Scenario: second of three writes fails
        let mut store = offline_store();
        let first = Product::new("First", 1.0, 2.0, 1.5);
        let second = Product::new("Second", 1.0, 2.0, 1.5);
        let third = Product::new("Third", 1.0, 2.0, 1.5);
        store.add_product_optimistic(first.clone());
        store.add_product_optimistic(second);
        store.add_product_optimistic(third);
        store.monitor().set_online();

        let remote = FakeRemote::default().fail_on_write(1);
        let mut engine = SyncEngine::new(&remote);

        let outcome = engine.run(&mut store).await.unwrap();
        assert_eq!(outcome, SyncOutcome::Failed);

        // First write landed remotely, no partial clear locally
        assert_eq!(remote.rows().len(), 1);
        assert_eq!(remote.rows()[0].id, first.id);
        assert_eq!(store.pending_ops().len(), 3);
        assert_eq!(engine.state(), SyncState::Idle);

        // Retry replays all three; the repeated create upserts, no duplicate
        remote.inner.lock().unwrap().fail_on_write = None;

        let outcome = engine.run(&mut store).await.unwrap();
        assert_eq!(outcome, SyncOutcome::Completed { applied: 3 });
        assert_eq!(remote.rows().len(), 3);
        assert!(store.pending_ops().is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_run_on_reconnect_drains_after_online_signal() {
        let mut store = offline_store();
        let product = Product::new("Queued Offline", 45.0, 65.0, 55.0);
        store.add_product_optimistic(product);

        let monitor = store.monitor().clone();
        let remote = FakeRemote::default();
        let mut engine = SyncEngine::new(&remote);

        let (outcome, ()) = tokio::join!(engine.run_on_reconnect(&mut store), async {
            monitor.set_online();
        });

        assert_eq!(outcome.unwrap(), SyncOutcome::Completed { applied: 1 });
        assert!(store.pending_ops().is_empty());
        assert_eq!(remote.rows().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_refresh_overwrites_local_with_remote_truth() {
        let mut store = offline_store();
        let local_only = Product::new("Local Only", 1.0, 2.0, 1.5);
        store.add_product_optimistic(local_only);
        store.monitor().set_online();

        let server_row = Product::new("Server Row", 9.0, 12.0, 10.0);
        let remote = FakeRemote::with_rows(vec![server_row.clone()]);
        let mut engine = SyncEngine::new(&remote);

        let outcome = engine.run(&mut store).await.unwrap();
        assert!(outcome.is_success());

        // Remote truth includes both the drained create and the server row
        let names: Vec<&str> = store
            .products()
            .iter()
            .map(|product| product.product_name.as_str())
            .collect();
        assert!(names.contains(&"Server Row"));
        assert!(names.contains(&"Local Only"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_fetch_failure_propagates_after_successful_drain() {
        let mut store = offline_store();
        let product = Product::new("Drained", 1.0, 2.0, 1.5);
        store.add_product_optimistic(product);
        store.monitor().set_online();

        let remote = FakeRemote::default().fail_list();
        let mut engine = SyncEngine::new(&remote);

        let error = engine.run(&mut store).await.unwrap_err();
        assert!(matches!(error, Error::Api(_)));

        // Drain completed, so the queue is gone; cached products remain
        assert!(store.pending_ops().is_empty());
        assert_eq!(store.products().len(), 1);
        assert_eq!(engine.state(), SyncState::Idle);
    }
}
