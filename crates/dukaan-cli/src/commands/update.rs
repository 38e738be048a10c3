use std::path::Path;

use dukaan_core::remote::RemoteStore;
use dukaan_core::{ConnectivityMonitor, ProductPatch};

use crate::commands::common::{
    initial_status, normalize_product_name, open_store, remote_from_env, resolve_product,
};
use crate::error::CliError;

pub struct UpdateArgs {
    pub id: String,
    pub name: Option<String>,
    pub cost: Option<f64>,
    pub selling: Option<f64>,
    pub lowest: Option<f64>,
    pub discount: Option<f64>,
    pub quantity: Option<i64>,
}

pub async fn run_update(args: UpdateArgs, db_path: &Path, offline: bool) -> Result<(), CliError> {
    let remote = remote_from_env();
    let monitor = ConnectivityMonitor::new(initial_status(offline, remote.is_some()));
    let mut store = open_store(db_path, monitor)?;

    let product = resolve_product(&args.id, store.products())?;

    let name = match args.name {
        Some(name) => Some(normalize_product_name(&name)?),
        None => None,
    };
    let patch = ProductPatch {
        product_name: name,
        cost_price: args.cost,
        selling_price: args.selling,
        lowest_selling_price: args.lowest,
        discount_percent: args.discount,
        quantity: args.quantity,
        photos: None,
    };

    if patch.is_empty() {
        println!("{}", product.id);
        return Ok(());
    }

    store.update_product_optimistic(product.id, patch.clone());

    if store.is_online() {
        if let Some(remote) = &remote {
            if let Err(error) = remote.patch_product(product.id, &patch).await {
                tracing::warn!("Remote update failed: {error}");
                eprintln!("Saved locally; remote write failed: {error}");
            }
        }
    }

    println!("{}", product.id);
    Ok(())
}
