use std::path::Path;
use std::time::Duration;

use rusqlite::Connection;

use crate::error::Result;

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS financial_transactions (
    id INTEGER PRIMARY KEY,
    date TEXT NOT NULL,
    description TEXT NOT NULL,
    category TEXT NOT NULL,
    type TEXT NOT NULL,
    amount REAL NOT NULL,
    status TEXT NOT NULL DEFAULT 'pending',
    payment_method TEXT,
    origin TEXT,
    notes TEXT,
    created_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS recurring_transactions (
    id TEXT PRIMARY KEY,
    description TEXT NOT NULL,
    category TEXT NOT NULL,
    type TEXT NOT NULL,
    amount REAL NOT NULL,
    status TEXT NOT NULL DEFAULT 'pending',
    payment_method TEXT,
    origin TEXT,
    notes TEXT,
    frequency TEXT NOT NULL,
    start_date TEXT NOT NULL,
    end_date TEXT,
    next_occurrence TEXT NOT NULL,
    day_of_month INTEGER,
    day_of_week INTEGER,
    notify_days_before INTEGER NOT NULL DEFAULT 3,
    notify_email TEXT,
    is_active INTEGER NOT NULL DEFAULT 1,
    auto_create INTEGER NOT NULL DEFAULT 1,
    occurrences_count INTEGER NOT NULL DEFAULT 0,
    max_occurrences INTEGER,
    created_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS recurring_transaction_occurrences (
    id INTEGER PRIMARY KEY,
    recurring_id TEXT NOT NULL,
    transaction_id INTEGER,
    scheduled_date TEXT NOT NULL,
    status TEXT NOT NULL,
    error TEXT,
    created_at TEXT DEFAULT (datetime('now')),
    FOREIGN KEY (recurring_id) REFERENCES recurring_transactions(id),
    FOREIGN KEY (transaction_id) REFERENCES financial_transactions(id)
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_occurrence_once_per_date
    ON recurring_transaction_occurrences (recurring_id, scheduled_date)
    WHERE status IN ('created', 'skipped');

CREATE TABLE IF NOT EXISTS recurring_transaction_notifications (
    id INTEGER PRIMARY KEY,
    recurring_id TEXT NOT NULL,
    scheduled_date TEXT NOT NULL,
    email TEXT,
    sent_at TEXT,
    created_at TEXT DEFAULT (datetime('now')),
    FOREIGN KEY (recurring_id) REFERENCES recurring_transactions(id)
);
";

pub fn get_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    conn.busy_timeout(Duration::from_secs(5))?;
    Ok(conn)
}

pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        (dir, conn)
    }

    #[test]
    fn test_init_db_creates_tables() {
        let (_dir, conn) = test_db();
        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();
        for expected in &[
            "financial_transactions",
            "recurring_transactions",
            "recurring_transaction_occurrences",
            "recurring_transaction_notifications",
        ] {
            assert!(tables.contains(&expected.to_string()), "missing table: {expected}");
        }
    }

    #[test]
    fn test_init_db_is_idempotent() {
        let (_dir, conn) = test_db();
        init_db(&conn).unwrap();
    }

    #[test]
    fn test_one_materialization_per_date() {
        let (_dir, conn) = test_db();
        conn.execute(
            "INSERT INTO recurring_transactions (id, description, category, type, amount, frequency, start_date, next_occurrence) \
             VALUES ('r1', 'Rent', 'Rent', 'expense', 100.0, 'monthly', '2024-01-01', '2024-01-01')",
            [],
        ).unwrap();
        conn.execute(
            "INSERT INTO recurring_transaction_occurrences (recurring_id, scheduled_date, status) \
             VALUES ('r1', '2024-01-01', 'created')",
            [],
        ).unwrap();
        // A second created/skipped row for the same date must be rejected.
        let dup = conn.execute(
            "INSERT INTO recurring_transaction_occurrences (recurring_id, scheduled_date, status) \
             VALUES ('r1', '2024-01-01', 'skipped')",
            [],
        );
        assert!(dup.is_err());
        // Failed attempts are not deduplicated.
        conn.execute(
            "INSERT INTO recurring_transaction_occurrences (recurring_id, scheduled_date, status, error) \
             VALUES ('r1', '2024-01-01', 'failed', 'boom')",
            [],
        ).unwrap();
        conn.execute(
            "INSERT INTO recurring_transaction_occurrences (recurring_id, scheduled_date, status, error) \
             VALUES ('r1', '2024-01-01', 'failed', 'boom again')",
            [],
        ).unwrap();
    }
}
