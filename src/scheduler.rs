use chrono::NaiveDate;
use rusqlite::{Connection, TransactionBehavior};

use crate::error::Result;
use crate::models::{Occurrence, OccurrenceStatus, RecurringTransaction};
use crate::schedule::next_occurrence;
use crate::store;

#[derive(Debug)]
pub enum ItemStatus {
    /// A new ledger row was materialized.
    Created { transaction_id: i64 },
    /// A matching ledger row already existed; the cursor still advanced.
    Skipped { transaction_id: i64 },
    /// Processing raised an error; the recurrence stays due and is retried
    /// on the next run.
    Failed(String),
}

#[derive(Debug)]
pub struct ItemResult {
    pub recurring_id: String,
    pub description: String,
    pub scheduled_date: NaiveDate,
    pub status: ItemStatus,
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub results: Vec<ItemResult>,
}

impl RunSummary {
    pub fn created(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.status, ItemStatus::Created { .. }))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.status, ItemStatus::Skipped { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.status, ItemStatus::Failed(_)))
            .count()
    }
}

/// One batch pass: materialize every due recurrence as of `today`.
///
/// Items are processed sequentially, each inside its own transaction, and a
/// failure on one item never aborts the batch. Only a store-level failure
/// (cannot query the due list, cannot record an attempt) propagates out.
pub fn run_batch(conn: &mut Connection, today: NaiveDate) -> Result<RunSummary> {
    let due = store::list_due(conn, today, false)?;

    let mut summary = RunSummary::default();
    for rec in due {
        let scheduled_date = rec.next_occurrence;
        let status = match process_one(conn, &rec) {
            Ok(status) => status,
            Err(e) => {
                let message = e.to_string();
                store::record_occurrence(
                    conn,
                    &Occurrence {
                        id: None,
                        recurring_id: rec.id.clone(),
                        transaction_id: None,
                        scheduled_date,
                        status: OccurrenceStatus::Failed,
                        error: Some(message.clone()),
                    },
                )?;
                ItemStatus::Failed(message)
            }
        };
        summary.results.push(ItemResult {
            recurring_id: rec.id,
            description: rec.description,
            scheduled_date,
            status,
        });
    }
    Ok(summary)
}

/// Materialize a single due recurrence inside an IMMEDIATE transaction.
/// The write lock plus the unique occurrence index make an overlapping
/// invocation unable to double-materialize the same scheduled date.
fn process_one(conn: &mut Connection, rec: &RecurringTransaction) -> Result<ItemStatus> {
    let due_date = rec.next_occurrence;
    let next = next_occurrence(due_date, rec.frequency, rec.day_of_month, rec.day_of_week);

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let status = match store::find_transaction_on(&tx, due_date, &rec.description, &rec.category)? {
        Some(existing) => {
            // Already in the ledger: link the attempt to the existing row
            // and advance the cursor without counting an occurrence.
            store::record_occurrence(
                &tx,
                &Occurrence {
                    id: None,
                    recurring_id: rec.id.clone(),
                    transaction_id: Some(existing.id),
                    scheduled_date: due_date,
                    status: OccurrenceStatus::Skipped,
                    error: None,
                },
            )?;
            store::advance(&tx, &rec.id, next)?;
            ItemStatus::Skipped { transaction_id: existing.id }
        }
        None => {
            let transaction_id = store::insert_transaction(&tx, &rec.ledger_entry(due_date))?;
            store::record_occurrence(
                &tx,
                &Occurrence {
                    id: None,
                    recurring_id: rec.id.clone(),
                    transaction_id: Some(transaction_id),
                    scheduled_date: due_date,
                    status: OccurrenceStatus::Created,
                    error: None,
                },
            )?;
            store::advance(&tx, &rec.id, next)?;
            store::increment_occurrence_count(&tx, &rec.id)?;
            ItemStatus::Created { transaction_id }
        }
    };

    tx.commit()?;
    Ok(status)
}
