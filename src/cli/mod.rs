pub mod add;
pub mod due;
pub mod history;
pub mod init;
pub mod list;
pub mod run;
pub mod status;
pub mod toggle;
pub mod upcoming;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "recur", about = "Recurring transaction scheduler for a small retail back-office ledger.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up recur: choose a data directory and initialize the database.
    Init {
        /// Path for recur data (default: ~/Documents/recur)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Add a recurring transaction.
    Add(AddArgs),
    /// List recurring transactions.
    List {
        /// Include inactive recurrences
        #[arg(long)]
        all: bool,
    },
    /// Preview everything due, including manual recurrences.
    Due {
        /// Evaluate as of this date: YYYY-MM-DD (default: today)
        #[arg(long = "as-of")]
        as_of: Option<String>,
    },
    /// Materialize due recurrences into the ledger (the daily batch pass).
    Run {
        /// Process as of this date: YYYY-MM-DD (default: today)
        #[arg(long = "as-of")]
        as_of: Option<String>,
    },
    /// Show the occurrence log.
    History {
        /// Recurrence id (or id prefix) to filter by
        id: Option<String>,
    },
    /// Re-activate a recurrence.
    Enable {
        /// Recurrence id (or unique id prefix)
        id: String,
    },
    /// Deactivate a recurrence without deleting it.
    Disable {
        /// Recurrence id (or unique id prefix)
        id: String,
    },
    /// Show recurrences entering their notification lead window.
    Upcoming {
        /// Evaluate as of this date: YYYY-MM-DD (default: today)
        #[arg(long = "as-of")]
        as_of: Option<String>,
    },
    /// Show current database and summary statistics.
    Status,
}

#[derive(Args)]
pub struct AddArgs {
    /// Description, e.g. 'Store rent'
    pub description: String,
    /// Amount (currency-agnostic)
    #[arg(long)]
    pub amount: f64,
    /// Transaction type: income, expense
    #[arg(long = "type")]
    pub txn_type: String,
    /// Category name
    #[arg(long)]
    pub category: String,
    /// Frequency: daily, weekly, biweekly, monthly, quarterly, semiannual, yearly
    #[arg(long)]
    pub frequency: String,
    /// First scheduled date: YYYY-MM-DD (default: today)
    #[arg(long)]
    pub start: Option<String>,
    /// Last eligible date: YYYY-MM-DD
    #[arg(long)]
    pub end: Option<String>,
    /// Day-of-month anchor (1-31) for monthly and longer frequencies
    #[arg(long = "day-of-month")]
    pub day_of_month: Option<u32>,
    /// Day-of-week anchor (0 = Sunday .. 6 = Saturday) for weekly
    #[arg(long = "day-of-week")]
    pub day_of_week: Option<u32>,
    /// Ledger status for materialized rows: paid, pending, overdue
    #[arg(long, default_value = "pending")]
    pub status: String,
    /// Payment method
    #[arg(long)]
    pub method: Option<String>,
    /// Free-text origin
    #[arg(long)]
    pub origin: Option<String>,
    /// Free-text notes
    #[arg(long)]
    pub notes: Option<String>,
    /// Days before the due date to notify (default from settings)
    #[arg(long = "notify-days")]
    pub notify_days: Option<i64>,
    /// Notification email
    #[arg(long = "notify-email")]
    pub notify_email: Option<String>,
    /// Stop after this many materializations
    #[arg(long = "max-occurrences")]
    pub max_occurrences: Option<i64>,
    /// Surface when due but never materialize automatically
    #[arg(long)]
    pub manual: bool,
}
