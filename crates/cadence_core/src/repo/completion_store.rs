//! Completion record store contract and in-memory implementation.
//!
//! # Responsibility
//! - Define the data access seam between the engine and the external
//!   completion record store.
//! - Provide a snapshot-backed store for callers that already hold the
//!   record set, and for tests.
//!
//! # Invariants
//! - `upsert` replaces the record for a key; implementations must make it
//!   atomic per key.
//! - `load` returns `None` for keys never written; callers read that as
//!   `done = false`.
//! - Records are never deleted through this contract.

use crate::model::checklist::UserId;
use crate::model::completion::{CompletionKey, CompletionRecord};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure reported by a completion store backend.
#[derive(Debug)]
pub enum StoreError {
    /// Backend could not be reached or refused the operation.
    Unavailable(String),
    /// Another writer changed the key between read and write.
    ///
    /// Raised by shared backends; the in-memory store never returns it.
    Conflict(CompletionKey),
    /// Backend failure with an underlying cause.
    Backend(Box<dyn Error + Send + Sync + 'static>),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(message) => write!(f, "completion store unavailable: {message}"),
            Self::Conflict(key) => write!(f, "concurrent completion write for {key}"),
            Self::Backend(err) => write!(f, "completion store failure: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Backend(err) => Some(err.as_ref()),
            Self::Unavailable(_) | Self::Conflict(_) => None,
        }
    }
}

/// Repository interface over completion records.
pub trait CompletionStore {
    fn load(&self, key: &CompletionKey) -> StoreResult<Option<CompletionRecord>>;
    fn upsert(&mut self, record: CompletionRecord) -> StoreResult<()>;
    fn list_for_user_on(&self, user_id: UserId, date: NaiveDate)
        -> StoreResult<Vec<CompletionRecord>>;
}

/// Completion store over an owned record map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCompletionStore {
    records: HashMap<CompletionKey, CompletionRecord>,
}

impl InMemoryCompletionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from a record snapshot; later records win per key.
    pub fn from_records(records: impl IntoIterator<Item = CompletionRecord>) -> Self {
        Self {
            records: records
                .into_iter()
                .map(|record| (record.key, record))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records, sorted by key for stable output.
    pub fn records(&self) -> Vec<CompletionRecord> {
        let mut records: Vec<CompletionRecord> = self.records.values().copied().collect();
        records.sort_by_key(|record| record.key);
        records
    }
}

impl CompletionStore for InMemoryCompletionStore {
    fn load(&self, key: &CompletionKey) -> StoreResult<Option<CompletionRecord>> {
        Ok(self.records.get(key).copied())
    }

    fn upsert(&mut self, record: CompletionRecord) -> StoreResult<()> {
        self.records.insert(record.key, record);
        Ok(())
    }

    fn list_for_user_on(
        &self,
        user_id: UserId,
        date: NaiveDate,
    ) -> StoreResult<Vec<CompletionRecord>> {
        let mut records: Vec<CompletionRecord> = self
            .records
            .values()
            .filter(|record| record.key.user_id == user_id && record.key.date == date)
            .copied()
            .collect();
        records.sort_by_key(|record| record.key);
        Ok(records)
    }
}

impl<S: CompletionStore + ?Sized> CompletionStore for &mut S {
    fn load(&self, key: &CompletionKey) -> StoreResult<Option<CompletionRecord>> {
        (**self).load(key)
    }

    fn upsert(&mut self, record: CompletionRecord) -> StoreResult<()> {
        (**self).upsert(record)
    }

    fn list_for_user_on(
        &self,
        user_id: UserId,
        date: NaiveDate,
    ) -> StoreResult<Vec<CompletionRecord>> {
        (**self).list_for_user_on(user_id, date)
    }
}
