use chrono::Local;
use colored::Colorize;

use crate::db::get_connection;
use crate::error::Result;
use crate::scheduler::{run_batch, ItemStatus};
use crate::settings::db_path;
use crate::store::parse_date;

pub fn run(as_of: Option<&str>) -> Result<()> {
    let today = match as_of {
        Some(s) => parse_date(s)?,
        None => Local::now().date_naive(),
    };

    let mut conn = get_connection(&db_path())?;
    let summary = run_batch(&mut conn, today)?;

    for item in &summary.results {
        match &item.status {
            ItemStatus::Created { transaction_id } => println!(
                "{} {} ({}) -> transaction #{transaction_id}",
                "created".green(),
                item.description,
                item.scheduled_date,
            ),
            ItemStatus::Skipped { transaction_id } => println!(
                "{} {} ({}) already in ledger as #{transaction_id}",
                "skipped".yellow(),
                item.description,
                item.scheduled_date,
            ),
            ItemStatus::Failed(message) => eprintln!(
                "{} {} ({}): {message}",
                "failed".red(),
                item.recurring_id,
                item.scheduled_date,
            ),
        }
    }

    println!(
        "{} created, {} skipped, {} failed",
        summary.created(),
        summary.skipped(),
        summary.failed()
    );
    Ok(())
}
