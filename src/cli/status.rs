use crate::db::get_connection;
use crate::error::Result;
use crate::settings::get_data_dir;

pub fn run() -> Result<()> {
    let data_dir = get_data_dir();
    let db_path = data_dir.join("recur.db");

    println!("Data dir:   {}", data_dir.display());
    println!("Database:   {}", db_path.display());

    if db_path.exists() {
        let conn = get_connection(&db_path)?;

        let active: i64 = conn.query_row(
            "SELECT count(*) FROM recurring_transactions WHERE is_active = 1",
            [],
            |r| r.get(0),
        )?;
        let total: i64 =
            conn.query_row("SELECT count(*) FROM recurring_transactions", [], |r| r.get(0))?;
        let occurrences: i64 = conn.query_row(
            "SELECT count(*) FROM recurring_transaction_occurrences",
            [],
            |r| r.get(0),
        )?;
        let failed: i64 = conn.query_row(
            "SELECT count(*) FROM recurring_transaction_occurrences WHERE status = 'failed'",
            [],
            |r| r.get(0),
        )?;
        let next_due: Option<String> = conn.query_row(
            "SELECT MIN(next_occurrence) FROM recurring_transactions WHERE is_active = 1",
            [],
            |r| r.get(0),
        )?;

        println!();
        println!("Recurrences:   {active} active / {total} total");
        println!("Occurrences:   {occurrences} ({failed} failed)");
        println!("Next due:      {}", next_due.as_deref().unwrap_or("(none)"));
    } else {
        println!();
        println!("Database not found. Run `recur init` to set up.");
    }

    Ok(())
}
