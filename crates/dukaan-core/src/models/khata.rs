//! Khata entry model

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{CustomerId, ProductId};

/// A product line on a khata entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductTaken {
    pub product_id: ProductId,
    /// Name captured at sale time, so the ledger survives product edits
    pub product_name: String,
    pub quantity: i64,
}

/// One ledger entry on a customer's khata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KhataEntry {
    /// Unique identifier
    pub id: Uuid,
    /// Customer this entry belongs to
    pub customer_id: CustomerId,
    /// Entry date, ISO `YYYY-MM-DD`
    pub date: String,
    /// Products taken on credit
    #[serde(default)]
    pub products_taken: Vec<ProductTaken>,
    /// Amount paid against the account on this entry
    pub amount_paid: f64,
    /// Balance still owed after this entry
    pub remaining_due: f64,
    /// Optional photo of the paper bill
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bill_photo_url: Option<String>,
    /// Creation timestamp (Unix ms)
    pub created_at: i64,
}

impl KhataEntry {
    /// Create a new entry dated today
    #[must_use]
    pub fn new(customer_id: CustomerId, amount_paid: f64, remaining_due: f64) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: Uuid::now_v7(),
            customer_id,
            date: now.format("%Y-%m-%d").to_string(),
            products_taken: Vec::new(),
            amount_paid,
            remaining_due,
            bill_photo_url: None,
            created_at: now.timestamp_millis(),
        }
    }
}
