use clap::{Parser, Subcommand};

/// Command-line interface definition for worklogger
/// CLI application to track work sessions and expenses in monthly JSON shards
#[derive(Parser)]
#[command(
    name = "worklogger",
    version = env!("CARGO_PKG_VERSION"),
    about = "Track work sessions and expenses in monthly JSON shards",
    long_about = None
)]
pub struct Cli {
    /// Override the records root directory (useful for tests or custom layouts)
    #[arg(global = true, long = "root")]
    pub root: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the configuration and the records directory layout
    Init,

    /// Manage the configuration file
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,
    },

    /// Add a work entry
    Add {
        /// Date of the session (YYYY-MM-DD)
        date: String,

        /// Company worked for
        company: String,

        #[arg(long, default_value_t = 0.0, help = "Hours worked")]
        hours: f64,

        #[arg(long, default_value_t = 0.0, help = "Extra minutes worked")]
        minutes: f64,

        #[arg(long = "double-pay", help = "Session paid at double rate")]
        double_pay: bool,

        #[arg(long, help = "Rate applied to this session")]
        rate: f64,

        #[arg(long, default_value = "hora", help = "Rate unit: hora or minuto")]
        unit: String,
    },

    /// Add an expense record
    Bill {
        /// Date of the expense (YYYY-MM-DD)
        date: String,

        /// Short description
        description: String,

        /// Amount (> 0)
        amount: f64,

        #[arg(
            long,
            help = "Category: BUSINESS, HEALTH, EDUCATION, PERSONAL or OTHER"
        )]
        category: Option<String>,
    },

    /// List records, optionally filtered
    List {
        #[arg(long, help = "Filter by 4-digit year, or 'All'")]
        year: Option<String>,

        #[arg(long, help = "Filter by 2-digit month, or 'All'")]
        month: Option<String>,

        #[arg(long, help = "Filter by company/label, or 'All'")]
        company: Option<String>,

        #[arg(long, help = "List bills instead of work entries")]
        bills: bool,
    },

    /// Delete one record from a shard
    Del {
        /// Shard key (YYYY-MM)
        key: String,

        #[arg(long, help = "Zero-based position of the record within the shard")]
        index: usize,

        #[arg(long, help = "Delete from the bill shard instead of the work log")]
        bills: bool,
    },

    /// Split a legacy monolithic worklog file into monthly shards
    Migrate {
        /// Path of the legacy file (e.g. worklog.json)
        file: String,
    },

    /// Manage pre-write backup snapshots
    Backup {
        #[arg(long, help = "Prune old snapshots, keeping the newest N")]
        rotate: bool,

        #[arg(long, value_name = "N", help = "How many snapshots to keep")]
        keep: Option<usize>,
    },

    /// Rebuild and print the years/months/companies lookup index
    Filters,

    /// Inspect or clear the in-process shard cache
    Cache {
        #[arg(long, help = "Drop cached shards")]
        clear: bool,

        #[arg(long, value_name = "KEY", help = "Only drop the given shard key")]
        key: Option<String>,
    },
}
