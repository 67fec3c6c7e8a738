use chrono::Local;
use uuid::Uuid;

use crate::cli::AddArgs;
use crate::db::get_connection;
use crate::error::{RecurError, Result};
use crate::models::RecurringTransaction;
use crate::settings::{db_path, load_settings};
use crate::store::{insert_recurrence, parse_date};

pub fn run(args: &AddArgs) -> Result<()> {
    if let Some(day) = args.day_of_month {
        if !(1..=31).contains(&day) {
            return Err(RecurError::Other(format!(
                "--day-of-month must be 1-31, got {day}"
            )));
        }
    }
    if let Some(day) = args.day_of_week {
        if day > 6 {
            return Err(RecurError::Other(format!(
                "--day-of-week must be 0-6 (0 = Sunday), got {day}"
            )));
        }
    }

    let start = match &args.start {
        Some(s) => parse_date(s)?,
        None => Local::now().date_naive(),
    };
    let end = args.end.as_deref().map(parse_date).transpose()?;
    if let Some(end) = end {
        if end < start {
            return Err(RecurError::Other(format!(
                "End date {end} is before the start date {start}"
            )));
        }
    }

    let settings = load_settings();
    let rec = RecurringTransaction {
        id: Uuid::new_v4().to_string(),
        description: args.description.clone(),
        category: args.category.clone(),
        txn_type: args.txn_type.parse()?,
        amount: args.amount,
        status: args.status.parse()?,
        payment_method: args.method.clone(),
        origin: args.origin.clone(),
        notes: args.notes.clone(),
        frequency: args.frequency.parse()?,
        start_date: start,
        end_date: end,
        next_occurrence: start,
        day_of_month: args.day_of_month,
        day_of_week: args.day_of_week,
        notify_days_before: args.notify_days.unwrap_or(settings.default_notify_days),
        notify_email: args.notify_email.clone(),
        is_active: true,
        auto_create: !args.manual,
        occurrences_count: 0,
        max_occurrences: args.max_occurrences,
    };

    let conn = get_connection(&db_path())?;
    insert_recurrence(&conn, &rec)?;

    println!(
        "Added {} recurrence: {} ({}), first due {}",
        rec.frequency.as_str(),
        rec.description,
        crate::fmt::short_id(&rec.id),
        rec.next_occurrence
    );
    Ok(())
}
