use crate::db::get_connection;
use crate::error::Result;
use crate::fmt::short_id;
use crate::settings::db_path;
use crate::store::{get_recurrence, set_active};

pub fn run(id: &str, active: bool) -> Result<()> {
    let conn = get_connection(&db_path())?;
    let rec = get_recurrence(&conn, id)?;
    set_active(&conn, &rec.id, active)?;
    println!(
        "{} {} ({})",
        if active { "Enabled" } else { "Disabled" },
        rec.description,
        short_id(&rec.id)
    );
    Ok(())
}
