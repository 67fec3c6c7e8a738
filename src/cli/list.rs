use comfy_table::{Cell, Table};

use crate::db::get_connection;
use crate::error::Result;
use crate::fmt::{amount, short_id};
use crate::settings::db_path;
use crate::store::list_recurrences;

pub fn run(all: bool) -> Result<()> {
    let conn = get_connection(&db_path())?;
    let recurrences = list_recurrences(&conn, all)?;

    if recurrences.is_empty() {
        println!("No recurrences. Add one with `recur add`.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        "ID", "Description", "Category", "Type", "Amount", "Frequency", "Next", "Count", "Active",
    ]);
    for rec in recurrences {
        let count = match rec.max_occurrences {
            Some(max) => format!("{}/{max}", rec.occurrences_count),
            None => rec.occurrences_count.to_string(),
        };
        table.add_row(vec![
            Cell::new(short_id(&rec.id)),
            Cell::new(&rec.description),
            Cell::new(&rec.category),
            Cell::new(rec.txn_type.as_str()),
            Cell::new(amount(rec.amount)),
            Cell::new(rec.frequency.as_str()),
            Cell::new(rec.next_occurrence),
            Cell::new(count),
            Cell::new(if rec.is_active { "yes" } else { "no" }),
        ]);
    }
    println!("Recurring transactions\n{table}");
    Ok(())
}
