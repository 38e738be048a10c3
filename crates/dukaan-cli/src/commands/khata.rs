use chrono::Utc;
use dukaan_core::remote::SupabaseStore;
use dukaan_core::{Customer, CustomerId, KhataEntry};

use crate::commands::common::{format_relative_time, remote_from_env};
use crate::error::CliError;

fn require_remote() -> Result<SupabaseStore, CliError> {
    remote_from_env().ok_or(CliError::RemoteNotConfigured)
}

fn parse_customer_id(raw: &str) -> Result<CustomerId, CliError> {
    raw.trim()
        .parse()
        .map_err(|_| CliError::InvalidCustomerId(raw.to_string()))
}

pub async fn run_add_customer(name: &str, phone: &str) -> Result<(), CliError> {
    let remote = require_remote()?;
    let customer = Customer::new(name.trim(), phone.trim());
    let created = remote.create_customer(&customer).await?;

    println!("{}", created.id);
    Ok(())
}

pub async fn run_customers(as_json: bool) -> Result<(), CliError> {
    let remote = require_remote()?;
    let customers = remote.list_customers().await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&customers)?);
        return Ok(());
    }

    for line in format_customer_lines(&customers) {
        println!("{line}");
    }
    Ok(())
}

pub async fn run_add_entry(customer_id: &str, paid: f64, due: f64) -> Result<(), CliError> {
    let remote = require_remote()?;
    let customer_id = parse_customer_id(customer_id)?;

    let entry = KhataEntry::new(customer_id, paid, due);
    let created = remote.create_khata_entry(&entry).await?;

    println!("{}", created.id);
    Ok(())
}

pub async fn run_entries(customer_id: &str, as_json: bool) -> Result<(), CliError> {
    let remote = require_remote()?;
    let customer_id = parse_customer_id(customer_id)?;

    let entries = remote.list_khata_entries(customer_id).await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for line in format_entry_lines(&entries) {
        println!("{line}");
    }
    Ok(())
}

fn format_customer_lines(customers: &[Customer]) -> Vec<String> {
    let now_ms = Utc::now().timestamp_millis();
    customers
        .iter()
        .map(|customer| {
            let short_id = customer.id.as_str().chars().take(13).collect::<String>();
            let relative_time = format_relative_time(customer.created_at, now_ms);
            format!(
                "{short_id:<13}  {:<20}  {:<12}  due {:>9.2}  {relative_time}",
                customer.customer_name, customer.customer_phone, customer.total_dues
            )
        })
        .collect()
}

fn format_entry_lines(entries: &[KhataEntry]) -> Vec<String> {
    entries
        .iter()
        .map(|entry| {
            let items = entry.products_taken.len();
            format!(
                "{}  {:>2} item(s)  paid {:>9.2}  due {:>9.2}",
                entry.date, items, entry.amount_paid, entry.remaining_due
            )
        })
        .collect()
}
