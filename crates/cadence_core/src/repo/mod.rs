//! Repository abstractions for engine-owned records.
//!
//! # Responsibility
//! - Define the data access contract for completion records.
//! - Keep storage backends outside the engine.
//!
//! # Invariants
//! - Writes are per-key upserts; nothing is deleted through this layer.

pub mod completion_store;
