use chrono::Local;
use comfy_table::{Cell, Table};

use crate::db::get_connection;
use crate::error::Result;
use crate::fmt::{amount, short_id};
use crate::settings::db_path;
use crate::store::{list_upcoming, parse_date};

pub fn run(as_of: Option<&str>) -> Result<()> {
    let as_of = match as_of {
        Some(s) => parse_date(s)?,
        None => Local::now().date_naive(),
    };

    let conn = get_connection(&db_path())?;
    let upcoming = list_upcoming(&conn, as_of)?;

    if upcoming.is_empty() {
        println!("Nothing entering its notification window as of {as_of}.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Due", "In", "Description", "Amount", "Notify"]);
    for rec in &upcoming {
        let days = (rec.next_occurrence - as_of).num_days();
        table.add_row(vec![
            Cell::new(short_id(&rec.id)),
            Cell::new(rec.next_occurrence),
            Cell::new(format!("{days}d")),
            Cell::new(&rec.description),
            Cell::new(amount(rec.amount)),
            Cell::new(rec.notify_email.clone().unwrap_or_default()),
        ]);
    }
    println!("Upcoming as of {as_of}\n{table}");
    Ok(())
}
