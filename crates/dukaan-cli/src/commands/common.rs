use std::env;
use std::path::{Path, PathBuf};

use chrono::Utc;
use dukaan_core::cache::SqliteCacheStore;
use dukaan_core::remote::SupabaseStore;
use dukaan_core::{ConnectivityMonitor, NetworkStatus, OfflineStore, Product, RemoteConfig};
use serde::Serialize;

use crate::error::CliError;

#[derive(Debug, Serialize)]
pub struct ProductListItem {
    pub id: String,
    pub product_name: String,
    pub cost_price: f64,
    pub selling_price: f64,
    pub lowest_selling_price: f64,
    pub discount_percent: Option<f64>,
    pub quantity: Option<i64>,
    pub updated_at: i64,
    pub relative_time: String,
}

pub fn resolve_db_path(cli_db_path: Option<PathBuf>) -> PathBuf {
    cli_db_path
        .or_else(|| env::var_os("DUKAAN_DB_PATH").map(PathBuf::from))
        .unwrap_or_else(default_db_path)
}

fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dukaan")
        .join("dukaan.db")
}

/// Initial connectivity, read synchronously at startup: forced offline by
/// flag, otherwise online exactly when a remote store is configured
pub const fn initial_status(offline_flag: bool, has_remote: bool) -> NetworkStatus {
    if offline_flag || !has_remote {
        NetworkStatus::Offline
    } else {
        NetworkStatus::Online
    }
}

/// Build the remote client when the environment carries a configuration
pub fn remote_from_env() -> Option<SupabaseStore> {
    let config = RemoteConfig::from_env()?;
    match SupabaseStore::new(&config) {
        Ok(store) => Some(store),
        Err(error) => {
            tracing::warn!("Failed to build remote client: {error}");
            None
        }
    }
}

pub fn open_store(
    db_path: &Path,
    monitor: ConnectivityMonitor,
) -> Result<OfflineStore<SqliteCacheStore>, CliError> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let cache = SqliteCacheStore::open(db_path)?;
    Ok(OfflineStore::open(cache, monitor))
}

/// Resolve a product from the local snapshot by exact id or unique prefix
pub fn resolve_product(query: &str, products: &[Product]) -> Result<Product, CliError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(CliError::ProductNotFound(String::new()));
    }

    let matching: Vec<&Product> = products
        .iter()
        .filter(|product| product.id.as_str().starts_with(query))
        .collect();

    match matching.len() {
        0 => Err(CliError::ProductNotFound(query.to_string())),
        1 => Ok(matching[0].clone()),
        _ => {
            let options = matching
                .iter()
                .take(3)
                .map(|product| product.id.as_str().chars().take(13).collect::<String>())
                .collect::<Vec<_>>()
                .join(", ");
            Err(CliError::AmbiguousProductId(format!(
                "ID prefix '{query}' is ambiguous; matches: {options}"
            )))
        }
    }
}

pub fn normalize_product_name(name: &str) -> Result<String, CliError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptyProductName)
    } else {
        Ok(trimmed.to_string())
    }
}

pub fn product_to_list_item(product: &Product) -> ProductListItem {
    let now_ms = Utc::now().timestamp_millis();

    ProductListItem {
        id: product.id.to_string(),
        product_name: product.product_name.clone(),
        cost_price: product.cost_price,
        selling_price: product.selling_price,
        lowest_selling_price: product.lowest_selling_price,
        discount_percent: product.discount_percent,
        quantity: product.quantity,
        updated_at: product.updated_at,
        relative_time: format_relative_time(product.updated_at, now_ms),
    }
}

pub fn format_product_lines(products: &[Product]) -> Vec<String> {
    let now_ms = Utc::now().timestamp_millis();
    products
        .iter()
        .map(|product| {
            let id = product.id.as_str();
            let short_id = id.chars().take(13).collect::<String>();
            let name = truncate_name(&product.product_name, 24);
            let stock = product
                .quantity
                .map_or_else(|| "-".to_string(), |quantity| quantity.to_string());
            let relative_time = format_relative_time(product.updated_at, now_ms);

            format!(
                "{short_id:<13}  {name:<24}  {:>8.2}  {:>8.2}  {stock:>5}  {relative_time}",
                product.cost_price, product.selling_price
            )
        })
        .collect()
}

fn truncate_name(name: &str, max_chars: usize) -> String {
    let collapsed = name.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = collapsed.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let diff = now_ms.saturating_sub(timestamp_ms);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;
    let month = 30 * day;
    let year = 365 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else if diff < month {
        format!("{}w ago", diff / week)
    } else if diff < year {
        format!("{}mo ago", diff / month)
    } else {
        format!("{}y ago", diff / year)
    }
}
