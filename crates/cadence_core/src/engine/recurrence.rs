//! Recurrence evaluation.
//!
//! # Responsibility
//! - Decide whether an obligation is due on a calendar day.
//!
//! # Invariants
//! - Evaluation is pure and total: incomplete rules use fixed defaults
//!   instead of failing.
//! - `every_x_days` is always due on its anchor day and never before it.
//!
//! # Runtime defaults for incomplete rules
//! - weekly/monthly without a day: due every day.
//! - every_x_days without an interval: interval of `MIN_INTERVAL_DAYS`.
//! - specific_date without a date: never due.
//!
//! `RecurrenceRule::validate()` turns each of these into a configuration
//! error; evaluation does not consult it.

use crate::model::checklist::ChecklistItem;
use crate::model::recurrence::{RecurrenceRule, MIN_INTERVAL_DAYS};
use chrono::{Datelike, NaiveDate};

/// Returns whether `rule` is due on `target`.
///
/// `anchor` is only read by `every_x_days` rules without a `start_date`.
/// A missing rule behaves as daily.
pub fn is_due(rule: Option<&RecurrenceRule>, anchor: NaiveDate, target: NaiveDate) -> bool {
    let Some(rule) = rule else {
        return true;
    };

    match rule {
        RecurrenceRule::Daily => true,
        RecurrenceRule::Weekly { day_of_week } => match day_of_week {
            Some(day) => weekday_index(target) == u32::from(*day),
            None => true,
        },
        RecurrenceRule::Monthly { day_of_month } => match day_of_month {
            Some(day) => target.day() == u32::from(*day),
            None => true,
        },
        RecurrenceRule::EveryXDays {
            interval_days,
            start_date,
        } => {
            let start = start_date.unwrap_or(anchor);
            if target < start {
                return false;
            }
            let interval = interval_days
                .unwrap_or(MIN_INTERVAL_DAYS)
                .max(MIN_INTERVAL_DAYS);
            (target - start).num_days() % i64::from(interval) == 0
        }
        RecurrenceRule::SpecificDate { specific_date } => *specific_date == Some(target),
    }
}

/// Evaluates an item's rule against its own anchor.
pub fn item_is_due(item: &ChecklistItem, target: NaiveDate) -> bool {
    is_due(item.recurrence.as_ref(), item.anchor_date(), target)
}

/// First day in `[from, from + horizon_days]` on which the rule is due.
///
/// Returns `None` when nothing falls inside the horizon.
pub fn next_due_on_or_after(
    rule: Option<&RecurrenceRule>,
    anchor: NaiveDate,
    from: NaiveDate,
    horizon_days: u32,
) -> Option<NaiveDate> {
    from.iter_days()
        .take(horizon_days as usize + 1)
        .find(|day| is_due(rule, anchor, *day))
}

/// Weekday with Sunday as 0.
fn weekday_index(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_sunday()
}

#[cfg(test)]
mod tests {
    use super::{is_due, next_due_on_or_after, weekday_index};
    use crate::model::recurrence::RecurrenceRule;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn weekday_index_starts_on_sunday() {
        assert_eq!(weekday_index(day(2024, 1, 7)), 0);
        assert_eq!(weekday_index(day(2024, 1, 9)), 2);
    }

    #[test]
    fn interval_below_minimum_is_clamped() {
        let rule = RecurrenceRule::every_x_days(1, Some(day(2024, 1, 1)));
        assert!(is_due(Some(&rule), day(2000, 1, 1), day(2024, 1, 3)));
        assert!(!is_due(Some(&rule), day(2000, 1, 1), day(2024, 1, 2)));
    }

    #[test]
    fn next_due_scans_inclusive_horizon() {
        let rule = RecurrenceRule::monthly(20);
        let anchor = day(2024, 1, 1);
        assert_eq!(
            next_due_on_or_after(Some(&rule), anchor, day(2024, 1, 15), 5),
            Some(day(2024, 1, 20))
        );
        assert_eq!(
            next_due_on_or_after(Some(&rule), anchor, day(2024, 1, 15), 4),
            None
        );
    }
}
