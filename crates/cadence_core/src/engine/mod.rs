//! Rule engine use-cases.
//!
//! # Responsibility
//! - Evaluate recurrence, audience, completion and cutoff rules over read
//!   snapshots supplied by the caller.
//!
//! # Invariants
//! - Engine functions keep no state between calls.
//! - Only `CompletionTracker` writes, and only through `CompletionStore`.

pub mod agenda;
pub mod assignment;
pub mod completion;
pub mod cutoff;
pub mod recurrence;
