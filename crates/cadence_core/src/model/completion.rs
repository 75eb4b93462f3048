//! Completion record model.
//!
//! # Invariants
//! - At most one record exists per `(item_id, user_id, date)`.
//! - A missing record means `done = false`.

use crate::model::checklist::{ItemId, UserId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Store key for one completion flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CompletionKey {
    pub item_id: ItemId,
    pub user_id: UserId,
    pub date: NaiveDate,
}

impl CompletionKey {
    pub fn new(item_id: ItemId, user_id: UserId, date: NaiveDate) -> Self {
        Self {
            item_id,
            user_id,
            date,
        }
    }
}

impl Display for CompletionKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.item_id, self.user_id, self.date)
    }
}

/// Persisted completion flag for one user, item and day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecord {
    #[serde(flatten)]
    pub key: CompletionKey,
    pub done: bool,
}

impl CompletionRecord {
    pub fn new(key: CompletionKey, done: bool) -> Self {
        Self { key, done }
    }
}
