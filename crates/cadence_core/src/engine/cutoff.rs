//! Cutoff period resolution and write-time validation.
//!
//! # Responsibility
//! - Map a transaction date to the configured period containing it.
//! - Validate candidate periods against the active set before a write.
//! - Offer a fixed closing-day fallback for dates outside every period.
//!
//! # Invariants
//! - Validation checks run in a fixed order and report the first failure.
//! - A rejected candidate produces no `CutoffPeriod` value at all.
//! - `validate` does not make a write atomic; the storage layer must run it
//!   inside the same transaction as the insert/update.

use crate::model::cutoff::{CompetenceMonth, CutoffPeriod, CutoffPeriodDraft, PeriodId};
use chrono::{Datelike, NaiveDate};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Whether a candidate creates a period or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Create,
    /// Overlap checks skip the record sharing the candidate's id.
    Update,
}

/// Required field of a cutoff period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutoffField {
    Name,
    StartDate,
    EndDate,
    CompetenceMonth,
}

impl CutoffField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::StartDate => "start_date",
            Self::EndDate => "end_date",
            Self::CompetenceMonth => "competence_month",
        }
    }
}

/// First rule a candidate period violates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CutoffValidationError {
    MissingField(CutoffField),
    InvalidOrdering {
        start_date: NaiveDate,
        end_date: NaiveDate,
    },
    CompetenceBeforeEnd {
        competence_month: CompetenceMonth,
        end_date: NaiveDate,
    },
    OverlapsExisting {
        period_id: PeriodId,
        name: String,
    },
}

impl CutoffValidationError {
    /// Machine-readable reason code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "missing_field",
            Self::InvalidOrdering { .. } => "invalid_ordering",
            Self::CompetenceBeforeEnd { .. } => "competence_before_end",
            Self::OverlapsExisting { .. } => "overlaps_existing",
        }
    }
}

impl Display for CutoffValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "cutoff period requires `{}`", field.as_str()),
            Self::InvalidOrdering {
                start_date,
                end_date,
            } => write!(
                f,
                "cutoff period start {start_date} is after end {end_date}"
            ),
            Self::CompetenceBeforeEnd {
                competence_month,
                end_date,
            } => write!(
                f,
                "competence month {competence_month} must be after the month of end date {end_date}"
            ),
            Self::OverlapsExisting { period_id, name } => write!(
                f,
                "cutoff period overlaps existing period `{name}` ({period_id})"
            ),
        }
    }
}

impl Error for CutoffValidationError {}

/// Period containing `date`, if any.
///
/// `None` is a normal outcome meaning no configured window applies.
pub fn resolve(periods: &[CutoffPeriod], date: NaiveDate) -> Option<&CutoffPeriod> {
    periods.iter().find(|period| period.contains(date))
}

/// Validates `candidate` against the active set `existing`.
///
/// # Errors
/// Checked in order, first failure returned:
/// 1. `MissingField` for an absent field or a blank name.
/// 2. `InvalidOrdering` when start is after end.
/// 3. `CompetenceBeforeEnd` unless the competence month is after end's month.
/// 4. `OverlapsExisting` for the first intersecting period; with
///    `WriteMode::Update` the record with the candidate's id is skipped.
pub fn validate(
    candidate: &CutoffPeriodDraft,
    existing: &[CutoffPeriod],
    mode: WriteMode,
) -> Result<CutoffPeriod, CutoffValidationError> {
    let result = validate_inner(candidate, existing, mode);
    match &result {
        Ok(period) => debug!(
            "event=cutoff_validate module=cutoff status=ok period_id={} start={} end={}",
            period.id, period.start_date, period.end_date
        ),
        Err(err) => warn!(
            "event=cutoff_validate module=cutoff status=rejected reason={}",
            err.code()
        ),
    }
    result
}

fn validate_inner(
    candidate: &CutoffPeriodDraft,
    existing: &[CutoffPeriod],
    mode: WriteMode,
) -> Result<CutoffPeriod, CutoffValidationError> {
    let name = candidate
        .name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or(CutoffValidationError::MissingField(CutoffField::Name))?;
    let start_date = candidate
        .start_date
        .ok_or(CutoffValidationError::MissingField(CutoffField::StartDate))?;
    let end_date = candidate
        .end_date
        .ok_or(CutoffValidationError::MissingField(CutoffField::EndDate))?;
    let competence_month = candidate
        .competence_month
        .ok_or(CutoffValidationError::MissingField(CutoffField::CompetenceMonth))?;

    if start_date > end_date {
        return Err(CutoffValidationError::InvalidOrdering {
            start_date,
            end_date,
        });
    }

    if competence_month <= CompetenceMonth::of(end_date) {
        return Err(CutoffValidationError::CompetenceBeforeEnd {
            competence_month,
            end_date,
        });
    }

    let self_id = match mode {
        WriteMode::Update => candidate.id,
        WriteMode::Create => None,
    };
    if let Some(conflict) = existing
        .iter()
        .filter(|period| Some(period.id) != self_id)
        .find(|period| period.overlaps(start_date, end_date))
    {
        return Err(CutoffValidationError::OverlapsExisting {
            period_id: conflict.id,
            name: conflict.name.clone(),
        });
    }

    // Creates always mint a fresh id so a copied draft cannot alias a stored period.
    let id = match mode {
        WriteMode::Create => uuid::Uuid::new_v4(),
        WriteMode::Update => candidate.id.unwrap_or_else(uuid::Uuid::new_v4),
    };

    Ok(CutoffPeriod {
        id,
        name: name.to_string(),
        start_date,
        end_date,
        competence_month,
    })
}

/// Problem found when auditing an already loaded period set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogIssue {
    InvalidOrdering(PeriodId),
    CompetenceBeforeEnd(PeriodId),
    Overlap(PeriodId, PeriodId),
}

/// Audits a loaded set; returns the first issue found.
///
/// Pairs are reported in input order, so the result is deterministic for a
/// given snapshot.
pub fn validate_catalog(periods: &[CutoffPeriod]) -> Result<(), CatalogIssue> {
    for (index, period) in periods.iter().enumerate() {
        if period.start_date > period.end_date {
            return Err(CatalogIssue::InvalidOrdering(period.id));
        }
        if period.competence_month <= CompetenceMonth::of(period.end_date) {
            return Err(CatalogIssue::CompetenceBeforeEnd(period.id));
        }
        if let Some(other) = periods[index + 1..]
            .iter()
            .find(|other| other.overlaps(period.start_date, period.end_date))
        {
            return Err(CatalogIssue::Overlap(period.id, other.id));
        }
    }
    Ok(())
}

/// Caller-side competence rule for dates outside every configured period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompetenceFallback {
    /// Windows close on this day of each month (clamped to month length).
    /// A date on or before the closing day belongs to the window closing
    /// that month; later dates to the one closing next month. Competence is
    /// the month after the window closes.
    ClosingDay(u32),
}

impl CompetenceFallback {
    /// Competence month the fallback assigns to `date`.
    pub fn competence_month(self, date: NaiveDate) -> CompetenceMonth {
        match self {
            Self::ClosingDay(day) => {
                let month = CompetenceMonth::of(date);
                let closing = day.clamp(1, month.days_in_month());
                let closing_month = if date.day() <= closing {
                    month
                } else {
                    month.next()
                };
                closing_month.next()
            }
        }
    }
}

/// Where a competence assignment came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "source", content = "period_id")]
pub enum CompetenceSource {
    Period(PeriodId),
    Fallback,
}

/// Competence month of one transaction date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetenceAssignment {
    pub date: NaiveDate,
    pub competence_month: CompetenceMonth,
    pub source: CompetenceSource,
}

/// Configured period first, then `fallback`, else `None`.
pub fn assign_competence(
    periods: &[CutoffPeriod],
    date: NaiveDate,
    fallback: Option<CompetenceFallback>,
) -> Option<CompetenceAssignment> {
    if let Some(period) = resolve(periods, date) {
        return Some(CompetenceAssignment {
            date,
            competence_month: period.competence_month,
            source: CompetenceSource::Period(period.id),
        });
    }

    fallback.map(|policy| CompetenceAssignment {
        date,
        competence_month: policy.competence_month(date),
        source: CompetenceSource::Fallback,
    })
}
