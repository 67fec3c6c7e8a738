use chrono::Local;
use comfy_table::{Cell, Table};

use crate::db::get_connection;
use crate::error::Result;
use crate::fmt::{amount, short_id};
use crate::settings::db_path;
use crate::store::{list_due, parse_date};

pub fn run(as_of: Option<&str>) -> Result<()> {
    let as_of = match as_of {
        Some(s) => parse_date(s)?,
        None => Local::now().date_naive(),
    };

    let conn = get_connection(&db_path())?;
    let due = list_due(&conn, as_of, true)?;

    if due.is_empty() {
        println!("Nothing due as of {as_of}.");
        return Ok(());
    }

    let manual = due.iter().filter(|r| !r.auto_create).count();

    let mut table = Table::new();
    table.set_header(vec!["ID", "Due", "Description", "Category", "Type", "Amount", "Auto"]);
    for rec in &due {
        table.add_row(vec![
            Cell::new(short_id(&rec.id)),
            Cell::new(rec.next_occurrence),
            Cell::new(&rec.description),
            Cell::new(&rec.category),
            Cell::new(rec.txn_type.as_str()),
            Cell::new(amount(rec.amount)),
            Cell::new(if rec.auto_create { "yes" } else { "no" }),
        ]);
    }
    println!("Due as of {as_of}\n{table}");
    if manual > 0 {
        println!("{manual} manual (Auto = no); `recur run` will not materialize these.");
    }
    Ok(())
}
