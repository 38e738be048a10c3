//! Dukaan CLI - Manage shop inventory and khata from the command line
//!
//! Mutations land in the local cache first and queue for sync when
//! offline, so the shop keeps running without a connection.

mod cli;
mod commands;
mod error;

use clap::Parser;

use crate::cli::{Cli, Commands, KhataCommands};
use crate::commands::add::{run_add, AddArgs};
use crate::commands::common::resolve_db_path;
use crate::commands::completions::run_completions;
use crate::commands::delete::run_delete;
use crate::commands::khata::{run_add_customer, run_add_entry, run_customers, run_entries};
use crate::commands::list::run_list;
use crate::commands::status::run_status;
use crate::commands::sync::run_sync;
use crate::commands::update::{run_update, UpdateArgs};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("dukaan_core=info".parse().expect("valid directive"))
                .add_directive("dukaan_cli=info".parse().expect("valid directive")),
        )
        .init();

    let cli = Cli::parse();
    let db_path = resolve_db_path(cli.db_path);
    let offline = cli.offline;

    match cli.command {
        Commands::Add {
            name,
            cost,
            selling,
            lowest,
            discount,
            quantity,
            photos,
        } => {
            run_add(
                AddArgs {
                    name,
                    cost,
                    selling,
                    lowest,
                    discount,
                    quantity,
                    photos,
                },
                &db_path,
                offline,
            )
            .await?;
        }
        Commands::List { limit, json } => run_list(limit, json, &db_path, offline)?,
        Commands::Update {
            id,
            name,
            cost,
            selling,
            lowest,
            discount,
            quantity,
        } => {
            run_update(
                UpdateArgs {
                    id,
                    name,
                    cost,
                    selling,
                    lowest,
                    discount,
                    quantity,
                },
                &db_path,
                offline,
            )
            .await?;
        }
        Commands::Delete { id } => run_delete(&id, &db_path, offline).await?,
        Commands::Sync => run_sync(&db_path, offline).await?,
        Commands::Status { json } => run_status(json, &db_path, offline)?,
        Commands::Khata { command } => match command {
            KhataCommands::AddCustomer { name, phone } => run_add_customer(&name, &phone).await?,
            KhataCommands::Customers { json } => run_customers(json).await?,
            KhataCommands::AddEntry {
                customer_id,
                paid,
                due,
            } => run_add_entry(&customer_id, paid, due).await?,
            KhataCommands::Entries { customer_id, json } => {
                run_entries(&customer_id, json).await?;
            }
        },
        Commands::Completions { shell, output } => run_completions(shell, output.as_deref())?,
    }

    Ok(())
}
