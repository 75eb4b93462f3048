//! Engine domain model.
//!
//! # Responsibility
//! - Define the read snapshots consumed by the rule engine: checklist
//!   catalog, recurrence rules, completion records and cutoff periods.
//!
//! # Invariants
//! - Every catalog object is identified by a stable UUID.
//! - Model types carry data and local validation only; cross-record rules
//!   live in `engine`.

pub mod checklist;
pub mod completion;
pub mod cutoff;
pub mod recurrence;
