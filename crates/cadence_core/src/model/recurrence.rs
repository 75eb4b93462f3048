//! Recurrence rule model.
//!
//! # Responsibility
//! - Define the tagged recurrence variants attached to checklist items.
//! - Validate rule completeness at configuration time.
//!
//! # Invariants
//! - Discriminating fields stay optional so incomplete stored rules can be
//!   loaded and reported instead of rejected at read time.
//! - Runtime evaluation never depends on `validate()` having been called.
//!
//! # See also
//! - `engine::recurrence` for due-date evaluation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Smallest interval honored by `every_x_days`; shorter values are clamped.
pub const MIN_INTERVAL_DAYS: u32 = 2;

/// Schedule that decides on which calendar days an item is due.
///
/// Serialized with a `type` tag, e.g.
/// `{"type":"weekly","day_of_week":2}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecurrenceRule {
    /// Due every day.
    Daily,
    /// Due on one weekday, `0 = Sunday .. 6 = Saturday`.
    Weekly {
        #[serde(default)]
        day_of_week: Option<u8>,
    },
    /// Due on one day of the month (`1..=31`).
    Monthly {
        #[serde(default)]
        day_of_month: Option<u8>,
    },
    /// Due on the anchor day and every `interval_days` after it.
    EveryXDays {
        #[serde(default)]
        interval_days: Option<u32>,
        /// Explicit anchor; the item creation date is used when absent.
        #[serde(default)]
        start_date: Option<NaiveDate>,
    },
    /// Due on exactly one calendar day.
    SpecificDate {
        #[serde(default)]
        specific_date: Option<NaiveDate>,
    },
}

impl RecurrenceRule {
    /// Builds a complete weekly rule.
    pub fn weekly(day_of_week: u8) -> Self {
        Self::Weekly {
            day_of_week: Some(day_of_week),
        }
    }

    /// Builds a complete monthly rule.
    pub fn monthly(day_of_month: u8) -> Self {
        Self::Monthly {
            day_of_month: Some(day_of_month),
        }
    }

    /// Builds an interval rule with an optional explicit anchor.
    pub fn every_x_days(interval_days: u32, start_date: Option<NaiveDate>) -> Self {
        Self::EveryXDays {
            interval_days: Some(interval_days),
            start_date,
        }
    }

    /// Builds a one-off rule.
    pub fn specific_date(date: NaiveDate) -> Self {
        Self::SpecificDate {
            specific_date: Some(date),
        }
    }

    /// Stable snake_case name of the variant, used in logs and errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly { .. } => "weekly",
            Self::Monthly { .. } => "monthly",
            Self::EveryXDays { .. } => "every_x_days",
            Self::SpecificDate { .. } => "specific_date",
        }
    }

    /// Explicit anchor carried by the rule, if any.
    pub fn start_date(&self) -> Option<NaiveDate> {
        match self {
            Self::EveryXDays { start_date, .. } => *start_date,
            _ => None,
        }
    }

    /// Rejects rules that would fall back to a runtime default.
    ///
    /// # Errors
    /// - Missing discriminating field for the variant.
    /// - Weekday outside `0..=6` or month day outside `1..=31`.
    /// - Interval shorter than [`MIN_INTERVAL_DAYS`].
    pub fn validate(&self) -> Result<(), RuleValidationError> {
        match *self {
            Self::Daily => Ok(()),
            Self::Weekly { day_of_week } => match day_of_week {
                None => Err(RuleValidationError::MissingDayOfWeek),
                Some(day) if day > 6 => Err(RuleValidationError::DayOfWeekOutOfRange(day)),
                Some(_) => Ok(()),
            },
            Self::Monthly { day_of_month } => match day_of_month {
                None => Err(RuleValidationError::MissingDayOfMonth),
                Some(day) if !(1..=31).contains(&day) => {
                    Err(RuleValidationError::DayOfMonthOutOfRange(day))
                }
                Some(_) => Ok(()),
            },
            Self::EveryXDays { interval_days, .. } => match interval_days {
                None => Err(RuleValidationError::MissingInterval),
                Some(days) if days < MIN_INTERVAL_DAYS => {
                    Err(RuleValidationError::IntervalTooShort(days))
                }
                Some(_) => Ok(()),
            },
            Self::SpecificDate { specific_date } => match specific_date {
                None => Err(RuleValidationError::MissingSpecificDate),
                Some(_) => Ok(()),
            },
        }
    }
}

/// Configuration-time rejection for an incomplete or out-of-range rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleValidationError {
    MissingDayOfWeek,
    DayOfWeekOutOfRange(u8),
    MissingDayOfMonth,
    DayOfMonthOutOfRange(u8),
    MissingInterval,
    IntervalTooShort(u32),
    MissingSpecificDate,
}

impl RuleValidationError {
    /// Machine-readable reason code.
    pub fn code(self) -> &'static str {
        match self {
            Self::MissingDayOfWeek => "missing_day_of_week",
            Self::DayOfWeekOutOfRange(_) => "day_of_week_out_of_range",
            Self::MissingDayOfMonth => "missing_day_of_month",
            Self::DayOfMonthOutOfRange(_) => "day_of_month_out_of_range",
            Self::MissingInterval => "missing_interval",
            Self::IntervalTooShort(_) => "interval_too_short",
            Self::MissingSpecificDate => "missing_specific_date",
        }
    }
}

impl Display for RuleValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingDayOfWeek => write!(f, "weekly rule requires day_of_week"),
            Self::DayOfWeekOutOfRange(day) => {
                write!(f, "day_of_week must be within 0..=6, got {day}")
            }
            Self::MissingDayOfMonth => write!(f, "monthly rule requires day_of_month"),
            Self::DayOfMonthOutOfRange(day) => {
                write!(f, "day_of_month must be within 1..=31, got {day}")
            }
            Self::MissingInterval => write!(f, "every_x_days rule requires interval_days"),
            Self::IntervalTooShort(days) => write!(
                f,
                "interval_days must be at least {MIN_INTERVAL_DAYS}, got {days}"
            ),
            Self::MissingSpecificDate => write!(f, "specific_date rule requires specific_date"),
        }
    }
}

impl Error for RuleValidationError {}
