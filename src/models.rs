use std::str::FromStr;

use chrono::NaiveDate;

use crate::error::RecurError;

/// How often a recurrence comes due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Daily,
    Weekly,
    Biweekly,
    Monthly,
    Quarterly,
    Semiannual,
    Yearly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Biweekly => "biweekly",
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::Semiannual => "semiannual",
            Frequency::Yearly => "yearly",
        }
    }
}

impl FromStr for Frequency {
    type Err = RecurError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "biweekly" => Ok(Frequency::Biweekly),
            "monthly" => Ok(Frequency::Monthly),
            "quarterly" => Ok(Frequency::Quarterly),
            "semiannual" => Ok(Frequency::Semiannual),
            "yearly" => Ok(Frequency::Yearly),
            other => Err(RecurError::UnknownFrequency(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxnType {
    Income,
    Expense,
}

impl TxnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxnType::Income => "income",
            TxnType::Expense => "expense",
        }
    }
}

impl FromStr for TxnType {
    type Err = RecurError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TxnType::Income),
            "expense" => Ok(TxnType::Expense),
            other => Err(RecurError::UnknownType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxnStatus {
    Paid,
    Pending,
    Overdue,
}

impl TxnStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxnStatus::Paid => "paid",
            TxnStatus::Pending => "pending",
            TxnStatus::Overdue => "overdue",
        }
    }
}

impl FromStr for TxnStatus {
    type Err = RecurError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "paid" => Ok(TxnStatus::Paid),
            "pending" => Ok(TxnStatus::Pending),
            "overdue" => Ok(TxnStatus::Overdue),
            other => Err(RecurError::UnknownStatus(other.to_string())),
        }
    }
}

/// Outcome of one materialization attempt. `Pending` is part of the stored
/// vocabulary for rows staged by hand; the scheduler itself only writes
/// `Created`, `Skipped`, and `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OccurrenceStatus {
    Pending,
    Created,
    Skipped,
    Failed,
}

impl OccurrenceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OccurrenceStatus::Pending => "pending",
            OccurrenceStatus::Created => "created",
            OccurrenceStatus::Skipped => "skipped",
            OccurrenceStatus::Failed => "failed",
        }
    }
}

impl FromStr for OccurrenceStatus {
    type Err = RecurError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OccurrenceStatus::Pending),
            "created" => Ok(OccurrenceStatus::Created),
            "skipped" => Ok(OccurrenceStatus::Skipped),
            "failed" => Ok(OccurrenceStatus::Failed),
            other => Err(RecurError::UnknownStatus(other.to_string())),
        }
    }
}

/// A template describing a ledger entry that repeats on a schedule.
/// `next_occurrence` is the mutable cursor: the next date this recurrence
/// comes due. It only ever moves forward.
#[derive(Debug, Clone)]
pub struct RecurringTransaction {
    pub id: String,
    pub description: String,
    pub category: String,
    pub txn_type: TxnType,
    pub amount: f64,
    pub status: TxnStatus,
    pub payment_method: Option<String>,
    pub origin: Option<String>,
    pub notes: Option<String>,
    pub frequency: Frequency,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub next_occurrence: NaiveDate,
    pub day_of_month: Option<u32>,
    pub day_of_week: Option<u32>,
    pub notify_days_before: i64,
    pub notify_email: Option<String>,
    pub is_active: bool,
    pub auto_create: bool,
    pub occurrences_count: i64,
    pub max_occurrences: Option<i64>,
}

impl RecurringTransaction {
    /// The ledger row this recurrence materializes into on `date`.
    pub fn ledger_entry(&self, date: NaiveDate) -> NewTransaction {
        NewTransaction {
            date,
            description: self.description.clone(),
            category: self.category.clone(),
            txn_type: self.txn_type,
            amount: self.amount,
            status: self.status,
            payment_method: self.payment_method.clone(),
            origin: self.origin.clone(),
            notes: self.notes.clone(),
        }
    }
}

/// One materialization attempt of a recurrence for one scheduled date.
/// Append-only: rows are never updated once written.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct Occurrence {
    pub id: Option<i64>,
    pub recurring_id: String,
    pub transaction_id: Option<i64>,
    pub scheduled_date: NaiveDate,
    pub status: OccurrenceStatus,
    pub error: Option<String>,
}

/// A row in the shared `financial_transactions` ledger.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct FinancialTransaction {
    pub id: i64,
    pub date: NaiveDate,
    pub description: String,
    pub category: String,
    pub txn_type: TxnType,
    pub amount: f64,
    pub status: TxnStatus,
    pub payment_method: Option<String>,
    pub origin: Option<String>,
    pub notes: Option<String>,
}

/// Fields for a ledger insert, before the row has an id.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub description: String,
    pub category: String,
    pub txn_type: TxnType,
    pub amount: f64,
    pub status: TxnStatus,
    pub payment_method: Option<String>,
    pub origin: Option<String>,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_roundtrip() {
        for s in &["daily", "weekly", "biweekly", "monthly", "quarterly", "semiannual", "yearly"] {
            let f: Frequency = s.parse().unwrap();
            assert_eq!(f.as_str(), *s);
        }
    }

    #[test]
    fn test_frequency_rejects_unknown() {
        assert!("fortnightly".parse::<Frequency>().is_err());
        assert!("".parse::<Frequency>().is_err());
    }

    #[test]
    fn test_txn_type_roundtrip() {
        assert_eq!("income".parse::<TxnType>().unwrap(), TxnType::Income);
        assert_eq!("expense".parse::<TxnType>().unwrap(), TxnType::Expense);
        assert!("transfer".parse::<TxnType>().is_err());
    }

    #[test]
    fn test_occurrence_status_roundtrip() {
        for s in &["pending", "created", "skipped", "failed"] {
            let st: OccurrenceStatus = s.parse().unwrap();
            assert_eq!(st.as_str(), *s);
        }
        assert!("done".parse::<OccurrenceStatus>().is_err());
    }

    #[test]
    fn test_ledger_entry_copies_financial_fields() {
        let rec = RecurringTransaction {
            id: "abc".to_string(),
            description: "Store rent".to_string(),
            category: "Rent".to_string(),
            txn_type: TxnType::Expense,
            amount: 1200.0,
            status: TxnStatus::Pending,
            payment_method: Some("transfer".to_string()),
            origin: Some("recurring".to_string()),
            notes: None,
            frequency: Frequency::Monthly,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: None,
            next_occurrence: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            day_of_month: Some(1),
            day_of_week: None,
            notify_days_before: 3,
            notify_email: None,
            is_active: true,
            auto_create: true,
            occurrences_count: 2,
            max_occurrences: None,
        };
        let due = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let entry = rec.ledger_entry(due);
        assert_eq!(entry.date, due);
        assert_eq!(entry.description, "Store rent");
        assert_eq!(entry.amount, 1200.0);
        assert_eq!(entry.txn_type, TxnType::Expense);
        assert_eq!(entry.payment_method.as_deref(), Some("transfer"));
    }
}
