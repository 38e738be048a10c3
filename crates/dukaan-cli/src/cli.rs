use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "dukaan")]
#[command(about = "Manage shop inventory and khata from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Optional path to the local cache database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// Force offline mode; mutations queue for a later `dukaan sync`
    #[arg(long, global = true)]
    pub offline: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a product to the inventory
    #[command(alias = "new")]
    Add {
        /// Product name
        name: String,
        /// Purchase cost
        #[arg(long)]
        cost: f64,
        /// Regular selling price
        #[arg(long)]
        selling: f64,
        /// Floor price for bargaining
        #[arg(long)]
        lowest: f64,
        /// Discount percentage
        #[arg(long)]
        discount: Option<f64>,
        /// Stock on hand
        #[arg(long)]
        quantity: Option<i64>,
        /// Photo URL (repeatable)
        #[arg(long = "photo", value_name = "URL")]
        photos: Vec<String>,
    },
    /// List cached products, newest first
    List {
        /// Number of products to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Update fields of an existing product
    Update {
        /// Product ID or unique ID prefix
        id: String,
        /// New product name
        #[arg(long)]
        name: Option<String>,
        /// New purchase cost
        #[arg(long)]
        cost: Option<f64>,
        /// New selling price
        #[arg(long)]
        selling: Option<f64>,
        /// New floor price
        #[arg(long)]
        lowest: Option<f64>,
        /// New discount percentage
        #[arg(long)]
        discount: Option<f64>,
        /// New stock count
        #[arg(long)]
        quantity: Option<i64>,
    },
    /// Delete an existing product
    Delete {
        /// Product ID or unique ID prefix
        id: String,
    },
    /// Replay queued operations and refresh from the remote store
    Sync,
    /// Show connectivity, queue, and cache state
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Customer ledger operations (online only)
    Khata {
        #[command(subcommand)]
        command: KhataCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum KhataCommands {
    /// Register a new customer
    AddCustomer {
        /// Customer name
        name: String,
        /// Contact phone number
        phone: String,
    },
    /// List customers, newest first
    Customers {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Record a ledger entry for a customer
    AddEntry {
        /// Customer ID
        customer_id: String,
        /// Amount paid on this entry
        #[arg(long, default_value = "0")]
        paid: f64,
        /// Balance still owed after this entry
        #[arg(long)]
        due: f64,
    },
    /// Show a customer's ledger, newest first
    Entries {
        /// Customer ID
        customer_id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
