use cadence_core::{
    build_agenda, AssignmentOverride, AudienceScope, CatalogSnapshot, ChecklistItem,
    ChecklistTemplate, CompletionTracker, InMemoryCompletionStore, ProgressTransition,
    RecurrenceRule, UserRef, UserRole, NEXT_DUE_HORIZON_DAYS,
};
use chrono::{NaiveDate, TimeZone, Utc};
use uuid::Uuid;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn item(text: &str, order_index: u32) -> ChecklistItem {
    let created_at = Utc.with_ymd_and_hms(2024, 1, 1, 7, 30, 0).unwrap();
    ChecklistItem::new(text, order_index, created_at)
}

struct Fixture {
    catalog: CatalogSnapshot,
    seller: UserRef,
    secretary: UserRef,
}

fn fixture() -> Fixture {
    let seller = UserRef::new(Uuid::new_v4(), UserRole::Sales);
    let secretary = UserRef::new(Uuid::new_v4(), UserRole::Secretary);

    let mut retired_item = item("Fax reports", 0);
    retired_item.is_active = false;

    let sales_daily = ChecklistTemplate::new("Sales routine")
        .with_scope(AudienceScope::roles([UserRole::Sales, UserRole::Manager]))
        .with_item(item("Review pipeline", 2))
        .with_item(item("Answer leads", 1))
        .with_item(item("Weekly forecast", 3).with_recurrence(RecurrenceRule::weekly(5)))
        .with_item(retired_item);
    let front_desk = ChecklistTemplate::new("Front desk")
        .with_scope(AudienceScope::roles([UserRole::Secretary]))
        .with_item(item("Open the office", 0));
    let assigned = ChecklistTemplate::new("Commission audit")
        .with_item(item("Reconcile ledger", 0).with_recurrence(RecurrenceRule::monthly(9)));

    let overrides = vec![AssignmentOverride::new(assigned.id, secretary.id)];

    Fixture {
        catalog: CatalogSnapshot {
            templates: vec![sales_daily, front_desk, assigned],
            overrides,
        },
        seller,
        secretary,
    }
}

#[test]
fn agenda_lists_visible_due_items_in_order() {
    let fixture = fixture();
    let tracker = CompletionTracker::new(InMemoryCompletionStore::new());
    let tuesday = day(2024, 1, 9);

    let agenda = build_agenda(&fixture.catalog, &fixture.seller, tuesday, &tracker).unwrap();

    assert_eq!(agenda.sections.len(), 1);
    let section = &agenda.sections[0];
    assert_eq!(section.title, "Sales routine");
    let texts: Vec<&str> = section.items.iter().map(|entry| entry.item.text.as_str()).collect();
    assert_eq!(texts, vec!["Answer leads", "Review pipeline"]);
    assert!(section.items.iter().all(|entry| !entry.done));
    assert_eq!((agenda.progress.completed, agenda.progress.total), (0, 2));
}

#[test]
fn agenda_combines_scope_and_override_paths() {
    let fixture = fixture();
    let tracker = CompletionTracker::new(InMemoryCompletionStore::new());
    let ninth = day(2024, 1, 9);

    let agenda = build_agenda(&fixture.catalog, &fixture.secretary, ninth, &tracker).unwrap();
    let titles: Vec<&str> = agenda.sections.iter().map(|section| section.title).collect();
    assert_eq!(titles, vec!["Front desk", "Commission audit"]);
    assert_eq!(agenda.progress.total, 2);

    let tenth = day(2024, 1, 10);
    let agenda = build_agenda(&fixture.catalog, &fixture.secretary, tenth, &tracker).unwrap();
    assert_eq!(agenda.sections.len(), 2);
    assert_eq!(agenda.non_empty_sections().count(), 1);
    assert_eq!(agenda.progress.total, 1);
}

#[test]
fn sections_report_next_occurrence_after_the_agenda_date() {
    let fixture = fixture();
    let tracker = CompletionTracker::new(InMemoryCompletionStore::new());
    let tenth = day(2024, 1, 10);

    let agenda = build_agenda(&fixture.catalog, &fixture.secretary, tenth, &tracker).unwrap();
    let front_desk = &agenda.sections[0];
    let audit = &agenda.sections[1];
    assert_eq!(front_desk.next_due, Some(day(2024, 1, 11)));
    assert!(audit.items.is_empty());
    assert_eq!(audit.next_due, Some(day(2024, 2, 9)));

    // The seller's Friday forecast is the only non-daily item; daily items win.
    let agenda = build_agenda(&fixture.catalog, &fixture.seller, tenth, &tracker).unwrap();
    assert_eq!(agenda.sections[0].next_due, Some(day(2024, 1, 11)));
}

#[test]
fn next_occurrence_is_bounded_by_horizon() {
    let manager = UserRef::new(Uuid::new_v4(), UserRole::Manager);
    let today = day(2024, 3, 1);
    let in_horizon = today + chrono::Days::new(u64::from(NEXT_DUE_HORIZON_DAYS));
    let beyond = in_horizon + chrono::Days::new(1);
    let catalog = CatalogSnapshot {
        templates: vec![
            ChecklistTemplate::new("Quarter close").with_item(
                item("Close books", 0).with_recurrence(RecurrenceRule::specific_date(in_horizon)),
            ),
            ChecklistTemplate::new("Annual review").with_item(
                item("Review plan", 0).with_recurrence(RecurrenceRule::specific_date(beyond)),
            ),
            ChecklistTemplate::new("Kickoff").with_item(
                item("Kickoff call", 0).with_recurrence(RecurrenceRule::specific_date(today)),
            ),
        ],
        overrides: Vec::new(),
    };
    let tracker = CompletionTracker::new(InMemoryCompletionStore::new());

    let agenda = build_agenda(&catalog, &manager, today, &tracker).unwrap();
    assert_eq!(agenda.sections[0].next_due, Some(in_horizon));
    assert_eq!(agenda.sections[1].next_due, None);
    assert_eq!(agenda.sections[2].items.len(), 1);
    assert_eq!(agenda.sections[2].next_due, None);
}

#[test]
fn agenda_progress_reports_completion_edge() {
    let fixture = fixture();
    let mut tracker = CompletionTracker::new(InMemoryCompletionStore::new());
    let tuesday = day(2024, 1, 9);
    let due_ids: Vec<Uuid> = {
        let agenda = build_agenda(&fixture.catalog, &fixture.seller, tuesday, &tracker).unwrap();
        agenda.sections[0]
            .items
            .iter()
            .map(|entry| entry.item.id)
            .collect()
    };

    tracker.toggle(due_ids[0], fixture.seller.id, tuesday).unwrap();
    let before = build_agenda(&fixture.catalog, &fixture.seller, tuesday, &tracker)
        .unwrap()
        .progress;
    assert_eq!(before.percent, 50);

    tracker.toggle(due_ids[1], fixture.seller.id, tuesday).unwrap();
    let agenda = build_agenda(&fixture.catalog, &fixture.seller, tuesday, &tracker).unwrap();
    assert!(agenda.sections[0].items.iter().all(|entry| entry.done));
    assert!(ProgressTransition::new(Some(before), agenda.progress).reached_full());
}

#[test]
fn catalog_snapshot_loads_from_json() {
    let raw = r#"{
        "templates": [{
            "id": "0d3b7a52-5f4e-4b8e-9c1a-6a2f0e8d4c11",
            "title": "Recruiting",
            "is_active": true,
            "audience_scope": {"roles": ["recruiter"]},
            "items": [{
                "id": "a6c1e9f0-2b3d-4e5f-8a9b-0c1d2e3f4a5b",
                "text": "Screen candidates",
                "is_active": true,
                "order_index": 0,
                "recurrence": {"type": "every_x_days", "interval_days": 2},
                "created_at": "2024-01-01T12:00:00Z"
            }]
        }]
    }"#;
    let catalog: CatalogSnapshot = serde_json::from_str(raw).unwrap();
    let recruiter = UserRef::new(Uuid::new_v4(), UserRole::Recruiter);
    let tracker = CompletionTracker::new(InMemoryCompletionStore::new());

    let due_day = build_agenda(&catalog, &recruiter, day(2024, 1, 3), &tracker).unwrap();
    assert_eq!(due_day.progress.total, 1);
    let off_day = build_agenda(&catalog, &recruiter, day(2024, 1, 4), &tracker).unwrap();
    assert_eq!(off_day.progress.total, 0);

    let sales = UserRef::new(Uuid::new_v4(), UserRole::Sales);
    let hidden = build_agenda(&catalog, &sales, day(2024, 1, 3), &tracker).unwrap();
    assert!(hidden.sections.is_empty());
}
