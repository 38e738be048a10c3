//! Remote store client
//!
//! The sync engine only sees the `RemoteStore` trait; production wires in
//! the Supabase-style REST implementation, tests wire in a fake.

mod rest;

pub use rest::SupabaseStore;

use crate::error::Result;
use crate::models::{Product, ProductId, ProductPatch};

/// The four operations the core consumes from the hosted data store
#[allow(async_fn_in_trait)]
pub trait RemoteStore {
    /// Idempotent create keyed by id; replaying an existing row must not
    /// duplicate it
    async fn upsert_product(&self, product: &Product) -> Result<()>;

    /// Partial field patch keyed by id; patching an absent row is a no-op
    async fn patch_product(&self, id: ProductId, patch: &ProductPatch) -> Result<()>;

    /// Delete keyed by id; deleting an absent row is a no-op
    async fn delete_product(&self, id: ProductId) -> Result<()>;

    /// Authoritative full fetch, newest first
    async fn list_products(&self) -> Result<Vec<Product>>;
}
