//! dukaan-core - Core library for Dukaan
//!
//! This crate contains the shared models, the offline-first product store,
//! and the sync layer used by all Dukaan interfaces. Mutations apply to
//! the local cache immediately; a pending queue records anything done
//! while offline and the sync engine replays it against the hosted store
//! once connectivity returns.

pub mod cache;
pub mod config;
pub mod connectivity;
pub mod db;
pub mod error;
pub mod models;
pub mod offline;
pub mod remote;
pub mod sync;
pub mod util;

pub use config::RemoteConfig;
pub use connectivity::{ConnectivityMonitor, NetworkStatus};
pub use error::{Error, Result};
pub use models::{
    Customer, CustomerId, KhataEntry, OperationKind, PendingOperation, Product, ProductId,
    ProductPatch,
};
pub use offline::OfflineStore;
pub use sync::{SyncEngine, SyncOutcome, SyncState};
