//! Product model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// A unique identifier for a product, using UUID v7 (time-sortable)
///
/// Ids generated locally (offline creates) and ids assigned by the remote
/// store share this representation; reconciliation trusts whatever the
/// remote fetch returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(Uuid);

impl ProductId {
    /// Create a new unique product ID using UUID v7
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Default for ProductId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProductId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A product in the shop inventory
///
/// `selling_price >= lowest_selling_price` is enforced by the forms layer,
/// not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier
    pub id: ProductId,
    /// Display name
    pub product_name: String,
    /// Purchase cost
    pub cost_price: f64,
    /// Regular selling price
    pub selling_price: f64,
    /// Floor price for bargaining
    pub lowest_selling_price: f64,
    /// Optional discount percentage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_percent: Option<f64>,
    /// Photo references (remote storage URLs)
    #[serde(default)]
    pub photos: Vec<String>,
    /// Stock on hand, when tracked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    /// Creation timestamp (Unix ms)
    pub created_at: i64,
    /// Last update timestamp (Unix ms)
    pub updated_at: i64,
}

impl Product {
    /// Create a new product with a freshly generated local id
    #[must_use]
    pub fn new(
        product_name: impl Into<String>,
        cost_price: f64,
        selling_price: f64,
        lowest_selling_price: f64,
    ) -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        Self {
            id: ProductId::new(),
            product_name: product_name.into(),
            cost_price,
            selling_price,
            lowest_selling_price,
            discount_percent: None,
            photos: Vec::new(),
            quantity: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update for a product; unset fields are left untouched
///
/// Serialized with `None` fields omitted, so a patch sent to the remote
/// store only carries the fields it actually changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selling_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lowest_selling_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photos: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
}

impl ProductPatch {
    /// True when no field is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Merge the set fields into `product`, bumping its update timestamp
    pub fn apply(&self, product: &mut Product) {
        if let Some(name) = &self.product_name {
            product.product_name.clone_from(name);
        }
        if let Some(cost) = self.cost_price {
            product.cost_price = cost;
        }
        if let Some(selling) = self.selling_price {
            product.selling_price = selling;
        }
        if let Some(lowest) = self.lowest_selling_price {
            product.lowest_selling_price = lowest;
        }
        if let Some(discount) = self.discount_percent {
            product.discount_percent = Some(discount);
        }
        if let Some(photos) = &self.photos {
            product.photos.clone_from(photos);
        }
        if let Some(quantity) = self.quantity {
            product.quantity = Some(quantity);
        }
        product.updated_at = chrono::Utc::now().timestamp_millis();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_product_id_unique() {
        let id1 = ProductId::new();
        let id2 = ProductId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_product_id_parse() {
        let id = ProductId::new();
        let parsed: ProductId = id.as_str().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_product_new() {
        let product = Product::new("LED Bulb", 45.0, 65.0, 55.0);
        assert_eq!(product.product_name, "LED Bulb");
        assert_eq!(product.cost_price, 45.0);
        assert!(product.photos.is_empty());
        assert!(product.created_at > 0);
        assert_eq!(product.created_at, product.updated_at);
    }

    #[test]
    fn test_patch_apply_merges_set_fields_only() {
        let mut product = Product::new("Fan", 700.0, 950.0, 850.0);
        let before = product.clone();

        let patch = ProductPatch {
            selling_price: Some(900.0),
            quantity: Some(12),
            ..ProductPatch::default()
        };
        patch.apply(&mut product);

        assert_eq!(product.selling_price, 900.0);
        assert_eq!(product.quantity, Some(12));
        assert_eq!(product.product_name, before.product_name);
        assert_eq!(product.cost_price, before.cost_price);
        assert!(product.updated_at >= before.updated_at);
    }

    #[test]
    fn test_patch_is_empty() {
        assert!(ProductPatch::default().is_empty());
        let patch = ProductPatch {
            cost_price: Some(1.0),
            ..ProductPatch::default()
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_patch_serializes_only_set_fields() {
        let patch = ProductPatch {
            selling_price: Some(900.0),
            ..ProductPatch::default()
        };
        let json = serde_json::to_string(&patch).unwrap();
        assert_eq!(json, r#"{"selling_price":900.0}"#);
    }
}
