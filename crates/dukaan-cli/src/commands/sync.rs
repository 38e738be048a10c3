use std::path::Path;

use dukaan_core::sync::reconcile;
use dukaan_core::{ConnectivityMonitor, SyncEngine, SyncOutcome};

use crate::commands::common::{initial_status, open_store, remote_from_env};
use crate::error::CliError;

pub async fn run_sync(db_path: &Path, offline: bool) -> Result<(), CliError> {
    let Some(remote) = remote_from_env() else {
        return Err(CliError::RemoteNotConfigured);
    };

    let monitor = ConnectivityMonitor::new(initial_status(offline, true));
    let mut store = open_store(db_path, monitor)?;
    let mut engine = SyncEngine::new(remote);

    match engine.run(&mut store).await? {
        SyncOutcome::Completed { applied } => {
            println!(
                "Sync completed: {applied} operation(s) replayed, {} product(s) cached",
                store.products().len()
            );
            Ok(())
        }
        SyncOutcome::Failed => Err(CliError::SyncFailed(store.pending_ops().len())),
        SyncOutcome::Skipped => {
            if store.is_online() {
                // Nothing queued; still refresh the cache from remote truth
                let latest = engine.fetch_latest_products().await?;
                let merged = reconcile(store.products(), latest);
                store.replace_products(merged);
                println!("Already up to date: {} product(s) cached", store.products().len());
            } else {
                println!(
                    "Offline: {} operation(s) queued for the next sync",
                    store.pending_ops().len()
                );
            }
            Ok(())
        }
    }
}
