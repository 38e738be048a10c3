use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] dukaan_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Product name cannot be empty")]
    EmptyProductName,
    #[error("Product not found for id/prefix: {0}")]
    ProductNotFound(String),
    #[error("{0}")]
    AmbiguousProductId(String),
    #[error("Customer id is not a valid UUID: {0}")]
    InvalidCustomerId(String),
    #[error(
        "Remote store is not configured. Set DUKAAN_SUPABASE_URL and DUKAAN_SUPABASE_ANON_KEY."
    )]
    RemoteNotConfigured,
    #[error("Sync failed; {0} operation(s) still pending. Retry with `dukaan sync`.")]
    SyncFailed(usize),
}
