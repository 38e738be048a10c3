use std::path::Path;

use chrono::Utc;
use dukaan_core::ConnectivityMonitor;
use serde::Serialize;

use crate::commands::common::{format_relative_time, initial_status, open_store, remote_from_env};
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct StatusReport {
    online: bool,
    remote_configured: bool,
    products: usize,
    pending_operations: usize,
    last_synced_at: Option<i64>,
}

pub fn run_status(as_json: bool, db_path: &Path, offline: bool) -> Result<(), CliError> {
    let remote_configured = remote_from_env().is_some();
    let monitor = ConnectivityMonitor::new(initial_status(offline, remote_configured));
    let store = open_store(db_path, monitor)?;

    let report = StatusReport {
        online: store.is_online(),
        remote_configured,
        products: store.products().len(),
        pending_operations: store.pending_ops().len(),
        last_synced_at: store.last_synced_at(),
    };

    if as_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "Connectivity:       {}",
        if report.online { "online" } else { "offline" }
    );
    println!(
        "Remote store:       {}",
        if report.remote_configured {
            "configured"
        } else {
            "not configured"
        }
    );
    println!("Cached products:    {}", report.products);
    println!("Pending operations: {}", report.pending_operations);

    let last_saved = report.last_synced_at.map_or_else(
        || "never".to_string(),
        |timestamp| format_relative_time(timestamp, Utc::now().timestamp_millis()),
    );
    println!("Last cache write:   {last_saved}");

    Ok(())
}
