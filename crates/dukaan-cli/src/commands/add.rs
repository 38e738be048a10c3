use std::path::Path;

use dukaan_core::remote::RemoteStore;
use dukaan_core::{ConnectivityMonitor, Product};

use crate::commands::common::{initial_status, normalize_product_name, open_store, remote_from_env};
use crate::error::CliError;

pub struct AddArgs {
    pub name: String,
    pub cost: f64,
    pub selling: f64,
    pub lowest: f64,
    pub discount: Option<f64>,
    pub quantity: Option<i64>,
    pub photos: Vec<String>,
}

pub async fn run_add(args: AddArgs, db_path: &Path, offline: bool) -> Result<(), CliError> {
    let name = normalize_product_name(&args.name)?;

    let remote = remote_from_env();
    let monitor = ConnectivityMonitor::new(initial_status(offline, remote.is_some()));
    let mut store = open_store(db_path, monitor)?;

    let mut product = Product::new(name, args.cost, args.selling, args.lowest);
    product.discount_percent = args.discount;
    product.quantity = args.quantity;
    product.photos = args.photos;

    store.add_product_optimistic(product.clone());

    // The local write already succeeded; a remote failure is only reported
    if store.is_online() {
        if let Some(remote) = &remote {
            if let Err(error) = remote.upsert_product(&product).await {
                tracing::warn!("Remote create failed: {error}");
                eprintln!("Saved locally; remote write failed: {error}");
            }
        }
    }

    println!("{}", product.id);
    Ok(())
}
