//! Pending operation queue

use crate::models::PendingOperation;

/// Append-only, insertion-ordered log of unconfirmed mutations
///
/// Entries are never coalesced: two updates to the same product produce two
/// entries, both replayed in order. Durability comes from the cache store
/// that persists the queue alongside the product list.
#[derive(Debug, Default)]
pub struct PendingQueue {
    ops: Vec<PendingOperation>,
}

impl PendingQueue {
    /// Rebuild the queue from persisted entries, preserving their order
    #[must_use]
    pub const fn from_ops(ops: Vec<PendingOperation>) -> Self {
        Self { ops }
    }

    /// Append an operation
    pub fn enqueue(&mut self, op: PendingOperation) {
        tracing::debug!(
            "Queued {} for product {}",
            op.kind.name(),
            op.product_id
        );
        self.ops.push(op);
    }

    /// All queued entries, oldest first; reading does not consume them
    #[must_use]
    pub fn ops(&self) -> &[PendingOperation] {
        &self.ops
    }

    /// Drop every entry; called only after a confirmed full drain
    pub fn clear(&mut self) {
        self.ops.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OperationKind, ProductId, ProductPatch};
    use pretty_assertions::assert_eq;

    fn update_op(id: ProductId, timestamp: i64) -> PendingOperation {
        PendingOperation {
            product_id: id,
            kind: OperationKind::Update(ProductPatch::default()),
            timestamp,
        }
    }

    #[test]
    fn test_enqueue_preserves_insertion_order() {
        let id = ProductId::new();
        let mut queue = PendingQueue::default();

        queue.enqueue(update_op(id, 30));
        queue.enqueue(update_op(id, 10));
        queue.enqueue(update_op(id, 20));

        let timestamps: Vec<i64> = queue.ops().iter().map(|op| op.timestamp).collect();
        assert_eq!(timestamps, vec![30, 10, 20]);
    }

    #[test]
    fn test_duplicate_updates_are_not_coalesced() {
        let id = ProductId::new();
        let mut queue = PendingQueue::default();

        queue.enqueue(update_op(id, 1));
        queue.enqueue(update_op(id, 2));

        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_reading_does_not_consume() {
        let mut queue = PendingQueue::default();
        queue.enqueue(update_op(ProductId::new(), 1));

        let _ = queue.ops();
        let _ = queue.ops();
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_clear_empties_queue() {
        let mut queue = PendingQueue::default();
        queue.enqueue(update_op(ProductId::new(), 1));

        queue.clear();
        assert!(queue.is_empty());
    }
}
