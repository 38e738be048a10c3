//! Pending operation model

use serde::{Deserialize, Serialize};

use super::{Product, ProductId, ProductPatch};

/// The mutation a pending operation replays against the remote store
///
/// Carries the full record for creates, the partial fields for updates,
/// and nothing for deletes, in the `{type, data}` shape the local
/// storage has always used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum OperationKind {
    Create(Product),
    Update(ProductPatch),
    Delete,
}

impl OperationKind {
    /// Short name for logs
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Create(_) => "create",
            Self::Update(_) => "update",
            Self::Delete => "delete",
        }
    }
}

/// A mutation performed locally but not yet confirmed by the remote store
///
/// Operations for the same product id must replay in ascending
/// `timestamp` order to preserve causal intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingOperation {
    /// Id of the product this operation targets
    pub product_id: ProductId,
    /// What to replay
    #[serde(flatten)]
    pub kind: OperationKind,
    /// Logical timestamp: epoch ms at enqueue time
    pub timestamp: i64,
}

impl PendingOperation {
    /// Build an operation stamped with the current wall clock
    #[must_use]
    pub fn new(product_id: ProductId, kind: OperationKind) -> Self {
        Self {
            product_id,
            kind,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_operation_roundtrip() {
        let product = Product::new("Soap", 18.0, 25.0, 22.0);
        let op = PendingOperation::new(product.id, OperationKind::Create(product.clone()));

        let json = serde_json::to_string(&op).unwrap();
        let parsed: PendingOperation = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, op);
    }

    #[test]
    fn test_operation_wire_shape() {
        let id = ProductId::new();
        let op = PendingOperation {
            product_id: id,
            kind: OperationKind::Delete,
            timestamp: 42,
        };

        let value = serde_json::to_value(&op).unwrap();
        assert_eq!(value["type"], "delete");
        assert_eq!(value["timestamp"], 42);
        assert!(value.get("data").is_none());
    }

    #[test]
    fn test_operation_kind_name() {
        assert_eq!(OperationKind::Delete.name(), "delete");
        let patch = ProductPatch::default();
        assert_eq!(OperationKind::Update(patch).name(), "update");
    }

    #[test]
    fn test_timestamps_are_monotonic_enough() {
        let id = ProductId::new();
        let first = PendingOperation::new(id, OperationKind::Delete);
        let second = PendingOperation::new(id, OperationKind::Delete);
        assert!(second.timestamp >= first.timestamp);
    }
}
