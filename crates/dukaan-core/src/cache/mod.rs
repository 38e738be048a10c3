//! Durable local cache for the product collection and pending operations
//!
//! Storage is a plain key-value table with fixed logical keys, wrapped in a
//! trait so tests can swap the sqlite backing for an in-memory one.

use std::collections::HashMap;
use std::path::Path;

use rusqlite::{params, OptionalExtension};
use serde::de::DeserializeOwned;

use crate::db::Database;
use crate::error::Result;
use crate::models::{PendingOperation, Product};

/// Key for the cached product collection
const PRODUCTS_KEY: &str = "products";
/// Key for the pending operation queue
const PENDING_OPS_KEY: &str = "pending-operations";
/// Key for the last successful save marker (epoch ms)
const LAST_SYNC_KEY: &str = "last-sync-timestamp";

/// Everything the cache knows, as of the last `save`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheSnapshot {
    pub products: Vec<Product>,
    pub pending_ops: Vec<PendingOperation>,
    pub last_synced_at: Option<i64>,
}

/// Trait for offline state persistence
///
/// `load` never fails: a missing or undecodable payload degrades to empty
/// collections so a corrupt cache can't take the app down. `save` reports
/// errors so the caller can decide to log and carry on.
pub trait CacheStore {
    /// Load the last persisted snapshot
    fn load(&self) -> CacheSnapshot;

    /// Persist both collections and stamp the last-sync marker
    fn save(&mut self, products: &[Product], pending_ops: &[PendingOperation]) -> Result<()>;
}

/// Decode a stored JSON payload, degrading to the default on failure
fn decode_or_empty<T: DeserializeOwned + Default>(key: &str, raw: Option<String>) -> T {
    let Some(raw) = raw else {
        return T::default();
    };

    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(error) => {
            tracing::warn!("Discarding undecodable cache entry '{key}': {error}");
            T::default()
        }
    }
}

/// `SQLite` implementation of `CacheStore`
pub struct SqliteCacheStore {
    db: Database,
}

impl SqliteCacheStore {
    /// Wrap an already opened database
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    /// Open (or create) the cache database at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(Database::open(path)?))
    }

    /// Open an in-memory cache database (useful for testing)
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::new(Database::open_in_memory()?))
    }

    fn get(&self, key: &str) -> Option<String> {
        self.db
            .connection()
            .query_row(
                "SELECT value FROM offline_state WHERE key = ?",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .unwrap_or_else(|error| {
                tracing::warn!("Failed to read cache entry '{key}': {error}");
                None
            })
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        self.db.connection().execute(
            "INSERT OR REPLACE INTO offline_state (key, value) VALUES (?, ?)",
            params![key, value],
        )?;
        Ok(())
    }
}

impl CacheStore for SqliteCacheStore {
    fn load(&self) -> CacheSnapshot {
        let products = decode_or_empty(PRODUCTS_KEY, self.get(PRODUCTS_KEY));
        let pending_ops = decode_or_empty(PENDING_OPS_KEY, self.get(PENDING_OPS_KEY));
        let last_synced_at = self
            .get(LAST_SYNC_KEY)
            .and_then(|raw| raw.parse::<i64>().ok());

        CacheSnapshot {
            products,
            pending_ops,
            last_synced_at,
        }
    }

    fn save(&mut self, products: &[Product], pending_ops: &[PendingOperation]) -> Result<()> {
        self.put(PRODUCTS_KEY, &serde_json::to_string(products)?)?;
        self.put(PENDING_OPS_KEY, &serde_json::to_string(pending_ops)?)?;
        self.put(
            LAST_SYNC_KEY,
            &crate::util::unix_timestamp_ms().to_string(),
        )?;
        Ok(())
    }
}

/// In-memory implementation of `CacheStore` for tests
///
/// Stores the same JSON payloads as the sqlite backing so both paths share
/// the encode/decode behavior.
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    entries: HashMap<String, String>,
}

impl MemoryCacheStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for MemoryCacheStore {
    fn load(&self) -> CacheSnapshot {
        let products = decode_or_empty(PRODUCTS_KEY, self.entries.get(PRODUCTS_KEY).cloned());
        let pending_ops =
            decode_or_empty(PENDING_OPS_KEY, self.entries.get(PENDING_OPS_KEY).cloned());
        let last_synced_at = self
            .entries
            .get(LAST_SYNC_KEY)
            .and_then(|raw| raw.parse::<i64>().ok());

        CacheSnapshot {
            products,
            pending_ops,
            last_synced_at,
        }
    }

    fn save(&mut self, products: &[Product], pending_ops: &[PendingOperation]) -> Result<()> {
        self.entries
            .insert(PRODUCTS_KEY.to_string(), serde_json::to_string(products)?);
        self.entries.insert(
            PENDING_OPS_KEY.to_string(),
            serde_json::to_string(pending_ops)?,
        );
        self.entries.insert(
            LAST_SYNC_KEY.to_string(),
            crate::util::unix_timestamp_ms().to_string(),
        );
        Ok(())
    }
}
