use comfy_table::{Cell, Table};

use crate::db::get_connection;
use crate::error::Result;
use crate::fmt::short_id;
use crate::settings::db_path;
use crate::store::list_occurrences;

pub fn run(id: Option<&str>) -> Result<()> {
    let conn = get_connection(&db_path())?;
    let occurrences = list_occurrences(&conn, id)?;

    if occurrences.is_empty() {
        println!("No occurrences recorded yet.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Scheduled", "Recurrence", "ID", "Status", "Transaction", "Error"]);
    for (occ, description) in &occurrences {
        let txn = occ
            .transaction_id
            .map(|id| format!("#{id}"))
            .unwrap_or_default();
        table.add_row(vec![
            Cell::new(occ.scheduled_date),
            Cell::new(description),
            Cell::new(short_id(&occ.recurring_id)),
            Cell::new(occ.status.as_str()),
            Cell::new(txn),
            Cell::new(occ.error.clone().unwrap_or_default()),
        ]);
    }
    println!("Occurrence log\n{table}");
    Ok(())
}
