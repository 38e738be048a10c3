use std::path::Path;

use dukaan_core::ConnectivityMonitor;

use crate::commands::common::{
    format_product_lines, initial_status, open_store, product_to_list_item, remote_from_env,
    ProductListItem,
};
use crate::error::CliError;

pub fn run_list(limit: usize, as_json: bool, db_path: &Path, offline: bool) -> Result<(), CliError> {
    let monitor = ConnectivityMonitor::new(initial_status(offline, remote_from_env().is_some()));
    let store = open_store(db_path, monitor)?;

    let products = &store.products()[..store.products().len().min(limit)];

    if as_json {
        let json_items = products
            .iter()
            .map(product_to_list_item)
            .collect::<Vec<ProductListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else {
        for line in format_product_lines(products) {
            println!("{line}");
        }
    }

    Ok(())
}
