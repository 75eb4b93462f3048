//! Completion tracking and progress aggregation.
//!
//! # Responsibility
//! - Flip or set per-user, per-day completion flags through a store.
//! - Aggregate completion over the items due on a day.
//!
//! # Invariants
//! - `toggle` is an involution: two calls restore the prior state. It is
//!   not safe for "mark complete" under retries; use `set_completion`.
//! - `percent` is `round(100 * completed / total)` half-up, `0` when
//!   nothing is due.
//! - UI effects (celebration on reaching 100%) belong to the caller; the
//!   engine only reports transitions.

use crate::engine::recurrence::item_is_due;
use crate::model::checklist::{ChecklistItem, ItemId, UserId};
use crate::model::completion::{CompletionKey, CompletionRecord};
use crate::repo::completion_store::{CompletionStore, StoreResult};
use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Completion summary over the items due on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Progress {
    pub completed: u32,
    pub total: u32,
    pub percent: u8,
}

impl Progress {
    /// Builds a summary; `completed` is capped at `total`.
    pub fn new(completed: u32, total: u32) -> Self {
        let completed = completed.min(total);
        Self {
            completed,
            total,
            percent: rounded_percent(completed, total),
        }
    }

    /// Non-empty and fully completed.
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }

    /// Sums two summaries and recomputes the percentage.
    pub fn merge(self, other: Self) -> Self {
        Self::new(
            self.completed + other.completed,
            self.total + other.total,
        )
    }
}

/// Two consecutive progress observations for edge detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressTransition {
    pub previous: Option<Progress>,
    pub current: Progress,
}

impl ProgressTransition {
    pub fn new(previous: Option<Progress>, current: Progress) -> Self {
        Self { previous, current }
    }

    /// True only on the step from incomplete to every due item done.
    ///
    /// Keyed on counts, not `percent`: 199 of 200 rounds to 100 but is not
    /// complete. The first observation (`previous == None`) never counts as a
    /// step.
    pub fn reached_full(&self) -> bool {
        match self.previous {
            Some(previous) => !previous.is_complete() && self.current.is_complete(),
            None => false,
        }
    }
}

/// Computes progress for `items` on `date` using an arbitrary lookup.
///
/// Only items due on `date` count toward `total`. Callers pass the already
/// visible and active items.
pub fn compute_progress<'a, I, F>(items: I, date: NaiveDate, mut is_done: F) -> Progress
where
    I: IntoIterator<Item = &'a ChecklistItem>,
    F: FnMut(ItemId) -> bool,
{
    let mut completed = 0_u32;
    let mut total = 0_u32;
    for item in items {
        if !item_is_due(item, date) {
            continue;
        }
        total += 1;
        if is_done(item.id) {
            completed += 1;
        }
    }
    Progress::new(completed, total)
}

/// Completion use-cases over a store implementation.
pub struct CompletionTracker<S: CompletionStore> {
    store: S,
}

impl<S: CompletionStore> CompletionTracker<S> {
    /// Creates a tracker using the provided store implementation.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Current flag for one key; missing records read as `false`.
    pub fn is_done(&self, item_id: ItemId, user_id: UserId, date: NaiveDate) -> StoreResult<bool> {
        let key = CompletionKey::new(item_id, user_id, date);
        Ok(self.store.load(&key)?.is_some_and(|record| record.done))
    }

    /// Flips the flag and returns the new state.
    pub fn toggle(&mut self, item_id: ItemId, user_id: UserId, date: NaiveDate) -> StoreResult<bool> {
        let key = CompletionKey::new(item_id, user_id, date);
        let current = self.store.load(&key)?.is_some_and(|record| record.done);
        let next = !current;
        self.store.upsert(CompletionRecord::new(key, next))?;
        debug!(
            "event=completion_toggle module=completion status=ok item_id={} user_id={} date={} done={}",
            item_id, user_id, date, next
        );
        Ok(next)
    }

    /// Sets the flag to `done`; returns whether the stored state changed.
    ///
    /// Repeating the call with the same arguments is a no-op.
    pub fn set_completion(
        &mut self,
        item_id: ItemId,
        user_id: UserId,
        date: NaiveDate,
        done: bool,
    ) -> StoreResult<bool> {
        let key = CompletionKey::new(item_id, user_id, date);
        let current = self.store.load(&key)?.is_some_and(|record| record.done);
        if current == done {
            return Ok(false);
        }
        self.store.upsert(CompletionRecord::new(key, done))?;
        debug!(
            "event=completion_set module=completion status=ok item_id={} user_id={} date={} done={}",
            item_id, user_id, date, done
        );
        Ok(true)
    }

    /// Progress of `user_id` over `items` on `date`.
    pub fn progress<'a, I>(&self, items: I, user_id: UserId, date: NaiveDate) -> StoreResult<Progress>
    where
        I: IntoIterator<Item = &'a ChecklistItem>,
    {
        let done_items = self.done_items(user_id, date)?;
        Ok(compute_progress(items, date, |item_id| {
            done_items.contains(&item_id)
        }))
    }

    /// Ids of items marked done by `user_id` on `date`.
    pub fn done_items(&self, user_id: UserId, date: NaiveDate) -> StoreResult<HashSet<ItemId>> {
        Ok(self
            .store
            .list_for_user_on(user_id, date)?
            .into_iter()
            .filter(|record| record.done)
            .map(|record| record.key.item_id)
            .collect())
    }
}

fn rounded_percent(completed: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let completed = u64::from(completed);
    let total = u64::from(total);
    let percent = (200 * completed + total) / (2 * total);
    u8::try_from(percent.min(100)).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use super::{rounded_percent, Progress, ProgressTransition};

    #[test]
    fn rounding_is_half_up() {
        assert_eq!(rounded_percent(1, 3), 33);
        assert_eq!(rounded_percent(2, 3), 67);
        assert_eq!(rounded_percent(1, 8), 13);
        assert_eq!(rounded_percent(0, 0), 0);
    }

    #[test]
    fn transition_fires_once_on_reaching_full() {
        let partial = Progress::new(2, 3);
        let full = Progress::new(3, 3);

        assert!(ProgressTransition::new(Some(partial), full).reached_full());
        assert!(!ProgressTransition::new(Some(full), full).reached_full());
        assert!(!ProgressTransition::new(None, full).reached_full());
        assert!(!ProgressTransition::new(Some(partial), Progress::new(0, 0)).reached_full());
    }

    #[test]
    fn rounded_hundred_is_not_full() {
        let almost = Progress::new(199, 200);
        assert_eq!(almost.percent, 100);
        assert!(!almost.is_complete());
        assert!(!ProgressTransition::new(Some(Progress::new(198, 200)), almost).reached_full());

        let full = Progress::new(200, 200);
        assert!(ProgressTransition::new(Some(almost), full).reached_full());
    }
}
