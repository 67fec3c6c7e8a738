use chrono::{Datelike, Duration, Months, NaiveDate};

use crate::models::Frequency;

/// Next scheduled date after `last` for the given frequency and anchors.
///
/// `day_of_week` uses 0 = Sunday .. 6 = Saturday and only applies to weekly
/// recurrences. `day_of_month` (1–31) only applies to monthly and longer
/// frequencies; an anchor past the end of the target month rolls into the
/// following month (day 31 in a 30-day month lands on the 1st). Without an
/// anchor, month arithmetic clamps to the shorter month's end.
///
/// The result is always strictly after `last`.
pub fn next_occurrence(
    last: NaiveDate,
    frequency: Frequency,
    day_of_month: Option<u32>,
    day_of_week: Option<u32>,
) -> NaiveDate {
    match frequency {
        Frequency::Daily => last + Duration::days(1),
        Frequency::Weekly => {
            let base = last + Duration::days(7);
            match day_of_week {
                Some(target) => {
                    let current = base.weekday().num_days_from_sunday();
                    let shift = (target as i64 - current as i64).rem_euclid(7);
                    base + Duration::days(shift)
                }
                None => base,
            }
        }
        Frequency::Biweekly => last + Duration::days(14),
        Frequency::Monthly => add_months(last, 1, day_of_month),
        Frequency::Quarterly => add_months(last, 3, day_of_month),
        Frequency::Semiannual => add_months(last, 6, day_of_month),
        Frequency::Yearly => add_months(last, 12, day_of_month),
    }
}

fn add_months(date: NaiveDate, months: u32, day_of_month: Option<u32>) -> NaiveDate {
    let shifted = date + Months::new(months);
    match day_of_month {
        Some(day) => {
            let first = shifted.with_day(1).unwrap_or(shifted);
            first + Duration::days(day as i64 - 1)
        }
        None => shifted,
    }
}
