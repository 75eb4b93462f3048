//! Daily agenda composition.
//!
//! Answers "what is due for this user on this day": visible templates, their
//! active items due that day, done flags and progress.

use crate::engine::assignment::visible_template_refs;
use crate::engine::completion::{compute_progress, CompletionTracker, Progress};
use crate::engine::recurrence::{item_is_due, next_due_on_or_after};
use crate::model::checklist::{CatalogSnapshot, ChecklistItem, TemplateId, UserRef};
use crate::repo::completion_store::{CompletionStore, StoreResult};
use chrono::{Days, NaiveDate};
use log::debug;

/// Days after the agenda date scanned for a section's next occurrence.
pub const NEXT_DUE_HORIZON_DAYS: u32 = 62;

/// One due item and its completion flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgendaItem<'a> {
    pub item: &'a ChecklistItem,
    pub done: bool,
}

/// Due items of one visible template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgendaSection<'a> {
    pub template_id: TemplateId,
    pub title: &'a str,
    pub items: Vec<AgendaItem<'a>>,
    pub progress: Progress,
    /// Earliest day after the agenda date on which any active item is due,
    /// within [`NEXT_DUE_HORIZON_DAYS`].
    pub next_due: Option<NaiveDate>,
}

/// Everything due for one user on one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agenda<'a> {
    pub date: NaiveDate,
    /// Visible templates in catalog order, including ones with nothing due.
    pub sections: Vec<AgendaSection<'a>>,
    pub progress: Progress,
}

impl<'a> Agenda<'a> {
    /// Sections with at least one due item.
    pub fn non_empty_sections(&self) -> impl Iterator<Item = &AgendaSection<'a>> + '_ {
        self.sections.iter().filter(|section| !section.items.is_empty())
    }
}

/// Builds the agenda of `user` for `date` from a catalog snapshot.
pub fn build_agenda<'a, S: CompletionStore>(
    catalog: &'a CatalogSnapshot,
    user: &UserRef,
    date: NaiveDate,
    tracker: &CompletionTracker<S>,
) -> StoreResult<Agenda<'a>> {
    let done_items = tracker.done_items(user.id, date)?;
    let mut sections = Vec::new();
    let mut overall = Progress::default();

    for template in visible_template_refs(&catalog.templates, &catalog.overrides, user) {
        let active = template.active_items();
        let next_due = next_due_after(&active, date);
        let due: Vec<&ChecklistItem> = active
            .into_iter()
            .filter(|item| item_is_due(item, date))
            .collect();
        let progress = compute_progress(due.iter().copied(), date, |item_id| {
            done_items.contains(&item_id)
        });
        overall = overall.merge(progress);

        sections.push(AgendaSection {
            template_id: template.id,
            title: template.title.as_str(),
            items: due
                .into_iter()
                .map(|item| AgendaItem {
                    item,
                    done: done_items.contains(&item.id),
                })
                .collect(),
            progress,
            next_due,
        });
    }

    debug!(
        "event=agenda_build module=agenda status=ok user_id={} date={} sections={} completed={} total={}",
        user.id,
        date,
        sections.len(),
        overall.completed,
        overall.total
    );

    Ok(Agenda {
        date,
        sections,
        progress: overall,
    })
}

fn next_due_after(items: &[&ChecklistItem], date: NaiveDate) -> Option<NaiveDate> {
    let from = date.checked_add_days(Days::new(1))?;
    items
        .iter()
        .filter_map(|item| {
            next_due_on_or_after(
                item.recurrence.as_ref(),
                item.anchor_date(),
                from,
                NEXT_DUE_HORIZON_DAYS - 1,
            )
        })
        .min()
}
