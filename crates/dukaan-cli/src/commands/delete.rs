use std::path::Path;

use dukaan_core::remote::RemoteStore;
use dukaan_core::ConnectivityMonitor;

use crate::commands::common::{initial_status, open_store, remote_from_env, resolve_product};
use crate::error::CliError;

pub async fn run_delete(id: &str, db_path: &Path, offline: bool) -> Result<(), CliError> {
    let remote = remote_from_env();
    let monitor = ConnectivityMonitor::new(initial_status(offline, remote.is_some()));
    let mut store = open_store(db_path, monitor)?;

    let product = resolve_product(id, store.products())?;

    store.delete_product_optimistic(product.id);

    if store.is_online() {
        if let Some(remote) = &remote {
            if let Err(error) = remote.delete_product(product.id).await {
                tracing::warn!("Remote delete failed: {error}");
                eprintln!("Removed locally; remote write failed: {error}");
            }
        }
    }

    println!("{}", product.id);
    Ok(())
}
