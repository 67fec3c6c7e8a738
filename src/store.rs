use chrono::NaiveDate;
use rusqlite::Connection;

use crate::error::{RecurError, Result};
use crate::models::{
    FinancialTransaction, NewTransaction, Occurrence, RecurringTransaction,
};

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| RecurError::InvalidDate(s.to_string()))
}

const REC_COLS: &str = "id, description, category, type, amount, status, payment_method, \
     origin, notes, frequency, start_date, end_date, next_occurrence, day_of_month, \
     day_of_week, notify_days_before, notify_email, is_active, auto_create, \
     occurrences_count, max_occurrences";

/// Untyped row shape as it comes back from SQLite. Converted into
/// `RecurringTransaction` before anything downstream sees it.
struct RawRecurrence {
    id: String,
    description: String,
    category: String,
    txn_type: String,
    amount: f64,
    status: String,
    payment_method: Option<String>,
    origin: Option<String>,
    notes: Option<String>,
    frequency: String,
    start_date: String,
    end_date: Option<String>,
    next_occurrence: String,
    day_of_month: Option<u32>,
    day_of_week: Option<u32>,
    notify_days_before: i64,
    notify_email: Option<String>,
    is_active: bool,
    auto_create: bool,
    occurrences_count: i64,
    max_occurrences: Option<i64>,
}

fn raw_from_row(row: &rusqlite::Row) -> rusqlite::Result<RawRecurrence> {
    Ok(RawRecurrence {
        id: row.get(0)?,
        description: row.get(1)?,
        category: row.get(2)?,
        txn_type: row.get(3)?,
        amount: row.get(4)?,
        status: row.get(5)?,
        payment_method: row.get(6)?,
        origin: row.get(7)?,
        notes: row.get(8)?,
        frequency: row.get(9)?,
        start_date: row.get(10)?,
        end_date: row.get(11)?,
        next_occurrence: row.get(12)?,
        day_of_month: row.get(13)?,
        day_of_week: row.get(14)?,
        notify_days_before: row.get(15)?,
        notify_email: row.get(16)?,
        is_active: row.get(17)?,
        auto_create: row.get(18)?,
        occurrences_count: row.get(19)?,
        max_occurrences: row.get(20)?,
    })
}

fn into_recurrence(raw: RawRecurrence) -> Result<RecurringTransaction> {
    Ok(RecurringTransaction {
        txn_type: raw.txn_type.parse()?,
        status: raw.status.parse()?,
        frequency: raw.frequency.parse()?,
        start_date: parse_date(&raw.start_date)?,
        end_date: raw.end_date.as_deref().map(parse_date).transpose()?,
        next_occurrence: parse_date(&raw.next_occurrence)?,
        id: raw.id,
        description: raw.description,
        category: raw.category,
        amount: raw.amount,
        payment_method: raw.payment_method,
        origin: raw.origin,
        notes: raw.notes,
        day_of_month: raw.day_of_month,
        day_of_week: raw.day_of_week,
        notify_days_before: raw.notify_days_before,
        notify_email: raw.notify_email,
        is_active: raw.is_active,
        auto_create: raw.auto_create,
        occurrences_count: raw.occurrences_count,
        max_occurrences: raw.max_occurrences,
    })
}

fn collect_recurrences(
    conn: &Connection,
    sql: &str,
    params: &[&dyn rusqlite::types::ToSql],
) -> Result<Vec<RecurringTransaction>> {
    let mut stmt = conn.prepare(sql)?;
    let raws: Vec<RawRecurrence> = stmt
        .query_map(params, raw_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    raws.into_iter().map(into_recurrence).collect()
}

/// Everything due for materialization as of `as_of`: active, not past its
/// end date, not at its occurrence cap, earliest due first. The scheduler
/// passes `include_manual = false` so auto_create = 0 rows are only
/// surfaced, never materialized.
pub fn list_due(
    conn: &Connection,
    as_of: NaiveDate,
    include_manual: bool,
) -> Result<Vec<RecurringTransaction>> {
    let sql = format!(
        "SELECT {REC_COLS} FROM recurring_transactions \
         WHERE is_active = 1 \
           AND (auto_create = 1 OR ?2 = 1) \
           AND next_occurrence <= ?1 \
           AND (end_date IS NULL OR next_occurrence <= end_date) \
           AND (max_occurrences IS NULL OR occurrences_count < max_occurrences) \
         ORDER BY next_occurrence ASC"
    );
    let as_of = as_of.to_string();
    collect_recurrences(conn, &sql, &[&as_of, &include_manual])
}

pub fn list_recurrences(
    conn: &Connection,
    include_inactive: bool,
) -> Result<Vec<RecurringTransaction>> {
    let sql = format!(
        "SELECT {REC_COLS} FROM recurring_transactions \
         WHERE (is_active = 1 OR ?1 = 1) \
         ORDER BY next_occurrence ASC"
    );
    collect_recurrences(conn, &sql, &[&include_inactive])
}

/// Active recurrences entering their notification lead window: due after
/// `as_of` but within each row's own days-before-due lead time.
pub fn list_upcoming(conn: &Connection, as_of: NaiveDate) -> Result<Vec<RecurringTransaction>> {
    let sql = format!(
        "SELECT {REC_COLS} FROM recurring_transactions \
         WHERE is_active = 1 \
           AND next_occurrence > ?1 \
           AND next_occurrence <= date(?1, '+' || notify_days_before || ' days') \
         ORDER BY next_occurrence ASC"
    );
    let as_of = as_of.to_string();
    collect_recurrences(conn, &sql, &[&as_of])
}

/// Look up a recurrence by id or unique id prefix.
pub fn get_recurrence(conn: &Connection, id: &str) -> Result<RecurringTransaction> {
    let sql = format!("SELECT {REC_COLS} FROM recurring_transactions WHERE id LIKE ?1 || '%'");
    let matches = collect_recurrences(conn, &sql, &[&id])?;
    let mut it = matches.into_iter();
    match (it.next(), it.next()) {
        (Some(rec), None) => Ok(rec),
        (Some(_), Some(_)) => Err(RecurError::Other(format!(
            "Id prefix '{id}' matches more than one recurrence; use a longer prefix"
        ))),
        (None, _) => Err(RecurError::UnknownRecurrence(id.to_string())),
    }
}

pub fn insert_recurrence(conn: &Connection, rec: &RecurringTransaction) -> Result<()> {
    conn.execute(
        "INSERT INTO recurring_transactions \
         (id, description, category, type, amount, status, payment_method, origin, notes, \
          frequency, start_date, end_date, next_occurrence, day_of_month, day_of_week, \
          notify_days_before, notify_email, is_active, auto_create, occurrences_count, max_occurrences) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21)",
        rusqlite::params![
            rec.id,
            rec.description,
            rec.category,
            rec.txn_type.as_str(),
            rec.amount,
            rec.status.as_str(),
            rec.payment_method,
            rec.origin,
            rec.notes,
            rec.frequency.as_str(),
            rec.start_date.to_string(),
            rec.end_date.map(|d| d.to_string()),
            rec.next_occurrence.to_string(),
            rec.day_of_month,
            rec.day_of_week,
            rec.notify_days_before,
            rec.notify_email,
            rec.is_active,
            rec.auto_create,
            rec.occurrences_count,
            rec.max_occurrences,
        ],
    )?;
    Ok(())
}

pub fn set_active(conn: &Connection, id: &str, active: bool) -> Result<()> {
    let changed = conn.execute(
        "UPDATE recurring_transactions SET is_active = ?2 WHERE id = ?1",
        rusqlite::params![id, active],
    )?;
    if changed == 0 {
        return Err(RecurError::UnknownRecurrence(id.to_string()));
    }
    Ok(())
}

/// Move the cursor forward. The `next_occurrence < ?2` guard keeps the
/// cursor monotonic: a stale or concurrent caller cannot move it back.
pub fn advance(conn: &Connection, id: &str, next: NaiveDate) -> Result<()> {
    conn.execute(
        "UPDATE recurring_transactions SET next_occurrence = ?2 \
         WHERE id = ?1 AND next_occurrence < ?2",
        rusqlite::params![id, next.to_string()],
    )?;
    Ok(())
}

pub fn increment_occurrence_count(conn: &Connection, id: &str) -> Result<()> {
    conn.execute(
        "UPDATE recurring_transactions SET occurrences_count = occurrences_count + 1 WHERE id = ?1",
        [id],
    )?;
    Ok(())
}

pub fn record_occurrence(conn: &Connection, occ: &Occurrence) -> Result<i64> {
    conn.execute(
        "INSERT INTO recurring_transaction_occurrences \
         (recurring_id, transaction_id, scheduled_date, status, error) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![
            occ.recurring_id,
            occ.transaction_id,
            occ.scheduled_date.to_string(),
            occ.status.as_str(),
            occ.error,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// De-duplication lookup: an existing ledger row for the same scheduled
/// date, description, and category.
pub fn find_transaction_on(
    conn: &Connection,
    date: NaiveDate,
    description: &str,
    category: &str,
) -> Result<Option<FinancialTransaction>> {
    let mut stmt = conn.prepare(
        "SELECT id, date, description, category, type, amount, status, payment_method, origin, notes \
         FROM financial_transactions \
         WHERE date = ?1 AND description = ?2 AND category = ?3 \
         LIMIT 1",
    )?;
    let raw: Option<(i64, String, String, String, String, f64, String, Option<String>, Option<String>, Option<String>)> =
        stmt.query_map(
            rusqlite::params![date.to_string(), description, category],
            |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                    row.get(5)?,
                    row.get(6)?,
                    row.get(7)?,
                    row.get(8)?,
                    row.get(9)?,
                ))
            },
        )?
        .next()
        .transpose()?;

    match raw {
        None => Ok(None),
        Some((id, date, description, category, txn_type, amount, status, payment_method, origin, notes)) => {
            Ok(Some(FinancialTransaction {
                id,
                date: parse_date(&date)?,
                description,
                category,
                txn_type: txn_type.parse()?,
                amount,
                status: status.parse()?,
                payment_method,
                origin,
                notes,
            }))
        }
    }
}

pub fn insert_transaction(conn: &Connection, txn: &NewTransaction) -> Result<i64> {
    conn.execute(
        "INSERT INTO financial_transactions \
         (date, description, category, type, amount, status, payment_method, origin, notes) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        rusqlite::params![
            txn.date.to_string(),
            txn.description,
            txn.category,
            txn.txn_type.as_str(),
            txn.amount,
            txn.status.as_str(),
            txn.payment_method,
            txn.origin,
            txn.notes,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Occurrence log, newest first, optionally filtered by recurrence id
/// prefix. Each row is paired with its recurrence's description.
pub fn list_occurrences(
    conn: &Connection,
    id_prefix: Option<&str>,
) -> Result<Vec<(Occurrence, String)>> {
    let prefix = id_prefix.unwrap_or("");
    let mut stmt = conn.prepare(
        "SELECT o.id, o.recurring_id, o.transaction_id, o.scheduled_date, o.status, o.error, r.description \
         FROM recurring_transaction_occurrences o \
         JOIN recurring_transactions r ON o.recurring_id = r.id \
         WHERE o.recurring_id LIKE ?1 || '%' \
         ORDER BY o.id DESC",
    )?;
    let raws: Vec<(i64, String, Option<i64>, String, String, Option<String>, String)> = stmt
        .query_map([prefix], |row| {
            Ok((
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
                row.get(5)?,
                row.get(6)?,
            ))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    raws.into_iter()
        .map(|(id, recurring_id, transaction_id, scheduled_date, status, error, description)| {
            Ok((
                Occurrence {
                    id: Some(id),
                    recurring_id,
                    transaction_id,
                    scheduled_date: parse_date(&scheduled_date)?,
                    status: status.parse()?,
                    error,
                },
                description,
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{get_connection, init_db};
    use crate::models::{Frequency, TxnStatus, TxnType};

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        (dir, conn)
    }

    fn sample(id: &str, next: &str) -> RecurringTransaction {
        RecurringTransaction {
            id: id.to_string(),
            description: format!("Recurrence {id}"),
            category: "Rent".to_string(),
            txn_type: TxnType::Expense,
            amount: 100.0,
            status: TxnStatus::Pending,
            payment_method: None,
            origin: None,
            notes: None,
            frequency: Frequency::Monthly,
            start_date: parse_date("2024-01-01").unwrap(),
            end_date: None,
            next_occurrence: parse_date(next).unwrap(),
            day_of_month: None,
            day_of_week: None,
            notify_days_before: 3,
            notify_email: None,
            is_active: true,
            auto_create: true,
            occurrences_count: 0,
            max_occurrences: None,
        }
    }

    fn as_of(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_insert_and_roundtrip() {
        let (_dir, conn) = test_db();
        let mut rec = sample("r1", "2024-03-15");
        rec.end_date = Some(parse_date("2025-01-01").unwrap());
        rec.day_of_month = Some(15);
        rec.max_occurrences = Some(12);
        insert_recurrence(&conn, &rec).unwrap();

        let loaded = get_recurrence(&conn, "r1").unwrap();
        assert_eq!(loaded.description, "Recurrence r1");
        assert_eq!(loaded.frequency, Frequency::Monthly);
        assert_eq!(loaded.next_occurrence, as_of("2024-03-15"));
        assert_eq!(loaded.end_date, Some(as_of("2025-01-01")));
        assert_eq!(loaded.day_of_month, Some(15));
        assert_eq!(loaded.max_occurrences, Some(12));
        assert!(loaded.is_active);
        assert!(loaded.auto_create);
    }

    #[test]
    fn test_list_due_orders_earliest_first() {
        let (_dir, conn) = test_db();
        insert_recurrence(&conn, &sample("late", "2024-03-10")).unwrap();
        insert_recurrence(&conn, &sample("early", "2024-02-01")).unwrap();
        insert_recurrence(&conn, &sample("future", "2024-04-01")).unwrap();

        let due = list_due(&conn, as_of("2024-03-15"), false).unwrap();
        let ids: Vec<&str> = due.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["early", "late"]);
    }

    #[test]
    fn test_list_due_excludes_inactive() {
        let (_dir, conn) = test_db();
        let mut rec = sample("r1", "2024-01-01");
        rec.is_active = false;
        insert_recurrence(&conn, &rec).unwrap();
        assert!(list_due(&conn, as_of("2024-03-15"), false).unwrap().is_empty());
    }

    #[test]
    fn test_list_due_excludes_exhausted_cap() {
        let (_dir, conn) = test_db();
        let mut rec = sample("r1", "2024-01-01");
        rec.max_occurrences = Some(3);
        rec.occurrences_count = 3;
        insert_recurrence(&conn, &rec).unwrap();
        // However overdue, a capped-out recurrence is never due.
        assert!(list_due(&conn, as_of("2030-01-01"), false).unwrap().is_empty());
    }

    #[test]
    fn test_list_due_excludes_past_end_date() {
        let (_dir, conn) = test_db();
        let mut rec = sample("r1", "2024-03-01");
        rec.end_date = Some(parse_date("2024-02-15").unwrap());
        insert_recurrence(&conn, &rec).unwrap();
        assert!(list_due(&conn, as_of("2024-03-15"), false).unwrap().is_empty());
    }

    #[test]
    fn test_list_due_manual_visibility() {
        let (_dir, conn) = test_db();
        let mut rec = sample("manual", "2024-03-01");
        rec.auto_create = false;
        insert_recurrence(&conn, &rec).unwrap();

        assert!(list_due(&conn, as_of("2024-03-15"), false).unwrap().is_empty());
        let surfaced = list_due(&conn, as_of("2024-03-15"), true).unwrap();
        assert_eq!(surfaced.len(), 1);
        assert!(!surfaced[0].auto_create);
    }

    #[test]
    fn test_advance_is_monotonic() {
        let (_dir, conn) = test_db();
        insert_recurrence(&conn, &sample("r1", "2024-03-15")).unwrap();

        advance(&conn, "r1", as_of("2024-04-15")).unwrap();
        assert_eq!(get_recurrence(&conn, "r1").unwrap().next_occurrence, as_of("2024-04-15"));

        // A stale caller trying to move the cursor back is a no-op.
        advance(&conn, "r1", as_of("2024-03-20")).unwrap();
        assert_eq!(get_recurrence(&conn, "r1").unwrap().next_occurrence, as_of("2024-04-15"));
    }

    #[test]
    fn test_increment_occurrence_count() {
        let (_dir, conn) = test_db();
        insert_recurrence(&conn, &sample("r1", "2024-03-15")).unwrap();
        increment_occurrence_count(&conn, "r1").unwrap();
        increment_occurrence_count(&conn, "r1").unwrap();
        assert_eq!(get_recurrence(&conn, "r1").unwrap().occurrences_count, 2);
    }

    #[test]
    fn test_find_transaction_on_matches_full_key() {
        let (_dir, conn) = test_db();
        let rec = sample("r1", "2024-03-15");
        let id = insert_transaction(&conn, &rec.ledger_entry(as_of("2024-03-15"))).unwrap();

        let found = find_transaction_on(&conn, as_of("2024-03-15"), "Recurrence r1", "Rent")
            .unwrap()
            .unwrap();
        assert_eq!(found.id, id);
        assert_eq!(found.amount, 100.0);

        assert!(find_transaction_on(&conn, as_of("2024-03-16"), "Recurrence r1", "Rent")
            .unwrap()
            .is_none());
        assert!(find_transaction_on(&conn, as_of("2024-03-15"), "Recurrence r1", "Utilities")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_get_recurrence_by_prefix() {
        let (_dir, conn) = test_db();
        insert_recurrence(&conn, &sample("abc-123", "2024-03-15")).unwrap();
        insert_recurrence(&conn, &sample("abd-456", "2024-03-15")).unwrap();

        assert_eq!(get_recurrence(&conn, "abc").unwrap().id, "abc-123");
        assert!(matches!(
            get_recurrence(&conn, "ab"),
            Err(RecurError::Other(_))
        ));
        assert!(matches!(
            get_recurrence(&conn, "zzz"),
            Err(RecurError::UnknownRecurrence(_))
        ));
    }

    #[test]
    fn test_set_active_toggles() {
        let (_dir, conn) = test_db();
        insert_recurrence(&conn, &sample("r1", "2024-01-01")).unwrap();
        set_active(&conn, "r1", false).unwrap();
        assert!(list_due(&conn, as_of("2024-03-15"), false).unwrap().is_empty());
        set_active(&conn, "r1", true).unwrap();
        assert_eq!(list_due(&conn, as_of("2024-03-15"), false).unwrap().len(), 1);
        assert!(set_active(&conn, "missing", true).is_err());
    }

    #[test]
    fn test_list_upcoming_honors_lead_time() {
        let (_dir, conn) = test_db();
        let mut soon = sample("soon", "2024-03-17");
        soon.notify_days_before = 3;
        insert_recurrence(&conn, &soon).unwrap();
        let mut far = sample("far", "2024-03-25");
        far.notify_days_before = 3;
        insert_recurrence(&conn, &far).unwrap();

        let upcoming = list_upcoming(&conn, as_of("2024-03-15")).unwrap();
        let ids: Vec<&str> = upcoming.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["soon"]);
    }
}
