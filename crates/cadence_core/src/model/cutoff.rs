//! Cutoff period and competence month model.
//!
//! # Responsibility
//! - Define configured date windows that map transactions to an accounting
//!   competence month.
//! - Provide the write-time draft shape validated by `engine::cutoff`.
//!
//! # Invariants
//! - `start_date <= end_date`, both inclusive.
//! - `competence_month` is strictly after the month of `end_date`.
//! - Periods of one active set never overlap.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

pub type PeriodId = Uuid;

static COMPETENCE_MONTH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{2})$").expect("valid competence month regex"));

/// Accounting month a transaction is attributed to.
///
/// Ordered chronologically; serialized as `"YYYY-MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CompetenceMonth {
    year: i32,
    month: u32,
}

impl CompetenceMonth {
    /// Returns `None` when `month` is outside `1..=12`.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    /// Month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    /// Following calendar month.
    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// First calendar day of this month.
    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// Number of days in this month.
    pub fn days_in_month(self) -> u32 {
        match (self.first_day(), self.next().first_day()) {
            (Some(first), Some(next_first)) => {
                u32::try_from((next_first - first).num_days()).unwrap_or(31)
            }
            _ => 31,
        }
    }

    /// Day `day` of this month, clamped to the month's last day.
    pub fn clamped_day(self, day: u32) -> Option<NaiveDate> {
        let day = day.clamp(1, self.days_in_month());
        NaiveDate::from_ymd_opt(self.year, self.month, day)
    }
}

impl Display for CompetenceMonth {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Parse failure for `"YYYY-MM"` month strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompetenceMonthParseError(String);

impl Display for CompetenceMonthParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid competence month `{}`; expected YYYY-MM", self.0)
    }
}

impl Error for CompetenceMonthParseError {}

impl FromStr for CompetenceMonth {
    type Err = CompetenceMonthParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let invalid = || CompetenceMonthParseError(trimmed.to_string());
        let caps = COMPETENCE_MONTH_RE.captures(trimmed).ok_or_else(invalid)?;
        let year = caps[1].parse::<i32>().map_err(|_| invalid())?;
        let month = caps[2].parse::<u32>().map_err(|_| invalid())?;
        Self::new(year, month).ok_or_else(invalid)
    }
}

impl Serialize for CompetenceMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CompetenceMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Validated, non-overlapping accounting window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CutoffPeriod {
    pub id: PeriodId,
    pub name: String,
    pub start_date: NaiveDate,
    /// Inclusive.
    pub end_date: NaiveDate,
    pub competence_month: CompetenceMonth,
}

impl CutoffPeriod {
    /// Returns whether `date` lies inside `[start_date, end_date]`.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Inclusive interval intersection test.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        start <= self.end_date && end >= self.start_date
    }
}

/// Candidate period as submitted by an administrative write.
///
/// `id` is `None` for creates; updates carry the id of the edited record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CutoffPeriodDraft {
    #[serde(default)]
    pub id: Option<PeriodId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub competence_month: Option<CompetenceMonth>,
}

impl CutoffPeriodDraft {
    /// Draft with every field set, for a new record.
    pub fn complete(
        name: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        competence_month: CompetenceMonth,
    ) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
            start_date: Some(start_date),
            end_date: Some(end_date),
            competence_month: Some(competence_month),
        }
    }
}

impl From<&CutoffPeriod> for CutoffPeriodDraft {
    fn from(value: &CutoffPeriod) -> Self {
        Self {
            id: Some(value.id),
            name: Some(value.name.clone()),
            start_date: Some(value.start_date),
            end_date: Some(value.end_date),
            competence_month: Some(value.competence_month),
        }
    }
}
