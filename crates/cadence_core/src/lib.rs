//! Temporal rule engine for recurring checklists and commission cutoffs.
//! This crate is the single source of truth for due-date, audience,
//! completion and competence-period rules.

pub mod config;
pub mod engine;
pub mod logging;
pub mod model;
pub mod repo;

pub use config::{CompetenceConfig, ConfigError, CoreConfig, LoggingConfig};
pub use engine::agenda::{
    build_agenda, Agenda, AgendaItem, AgendaSection, NEXT_DUE_HORIZON_DAYS,
};
pub use engine::assignment::{
    effective_audience, is_visible_to, visible_template_refs, visible_templates, Audience,
};
pub use engine::completion::{compute_progress, CompletionTracker, Progress, ProgressTransition};
pub use engine::cutoff::{
    assign_competence, resolve, validate, validate_catalog, CatalogIssue, CompetenceAssignment,
    CompetenceFallback, CompetenceSource, CutoffField, CutoffValidationError, WriteMode,
};
pub use engine::recurrence::{is_due, item_is_due, next_due_on_or_after};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::checklist::{
    AssignmentOverride, AudienceScope, CatalogSnapshot, ChecklistItem, ChecklistTemplate, ItemId,
    TemplateId, UserId, UserRef, UserRole,
};
pub use model::completion::{CompletionKey, CompletionRecord};
pub use model::cutoff::{
    CompetenceMonth, CompetenceMonthParseError, CutoffPeriod, CutoffPeriodDraft, PeriodId,
};
pub use model::recurrence::{RecurrenceRule, RuleValidationError, MIN_INTERVAL_DAYS};
pub use repo::completion_store::{
    CompletionStore, InMemoryCompletionStore, StoreError, StoreResult,
};

/// Minimal health-check API for integration checks.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
