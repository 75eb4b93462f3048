use cadence_core::{is_due, item_is_due, ChecklistItem, RecurrenceRule, RuleValidationError};
use chrono::{Datelike, NaiveDate, TimeZone, Utc, Weekday};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn missing_rule_and_daily_are_always_due() {
    let anchor = day(2024, 1, 1);
    for target in day(2023, 12, 1).iter_days().take(60) {
        assert!(is_due(None, anchor, target));
        assert!(is_due(Some(&RecurrenceRule::Daily), anchor, target));
    }
}

#[test]
fn weekly_matches_only_its_weekday() {
    let rule = RecurrenceRule::weekly(2);
    let anchor = day(2024, 1, 1);
    for target in day(2024, 1, 1).iter_days().take(28) {
        assert_eq!(
            is_due(Some(&rule), anchor, target),
            target.weekday() == Weekday::Tue,
            "unexpected result for {target}"
        );
    }
}

#[test]
fn monthly_matches_day_of_month_and_skips_short_months() {
    let rule = RecurrenceRule::monthly(31);
    let anchor = day(2024, 1, 1);
    assert!(is_due(Some(&rule), anchor, day(2024, 1, 31)));
    assert!(!is_due(Some(&rule), anchor, day(2024, 1, 30)));
    let february_hits = day(2024, 2, 1)
        .iter_days()
        .take(29)
        .filter(|target| is_due(Some(&rule), anchor, *target))
        .count();
    assert_eq!(february_hits, 0);
}

#[test]
fn every_x_days_follows_explicit_start_date() {
    let rule = RecurrenceRule::every_x_days(3, Some(day(2024, 1, 1)));
    let anchor = day(2023, 6, 1);

    for due in [day(2024, 1, 1), day(2024, 1, 4), day(2024, 1, 7)] {
        assert!(is_due(Some(&rule), anchor, due), "{due} should be due");
    }
    for not_due in [
        day(2024, 1, 2),
        day(2024, 1, 3),
        day(2024, 1, 5),
        day(2024, 1, 6),
    ] {
        assert!(!is_due(Some(&rule), anchor, not_due), "{not_due} should not be due");
    }
    assert!(!is_due(Some(&rule), anchor, day(2023, 12, 29)));
}

#[test]
fn every_x_days_falls_back_to_item_creation_day() {
    let created = Utc.with_ymd_and_hms(2024, 3, 10, 8, 0, 0).unwrap();
    let item = ChecklistItem::new("restock brochures", 0, created)
        .with_recurrence(RecurrenceRule::every_x_days(5, None));

    assert!(item_is_due(&item, day(2024, 3, 10)));
    assert!(item_is_due(&item, day(2024, 3, 15)));
    assert!(!item_is_due(&item, day(2024, 3, 12)));
    assert!(!item_is_due(&item, day(2024, 3, 5)));
}

#[test]
fn specific_date_is_a_single_occurrence() {
    let rule = RecurrenceRule::specific_date(day(2024, 3, 15));
    let anchor = day(2024, 1, 1);
    assert!(is_due(Some(&rule), anchor, day(2024, 3, 15)));
    assert!(!is_due(Some(&rule), anchor, day(2025, 3, 15)));
    assert!(!is_due(Some(&rule), anchor, day(2024, 3, 14)));
}

#[test]
fn incomplete_rules_use_runtime_defaults_and_fail_validation() {
    let anchor = day(2024, 1, 1);
    let target = day(2024, 1, 17);

    let weekly: RecurrenceRule = serde_json::from_str(r#"{"type":"weekly"}"#).unwrap();
    assert!(is_due(Some(&weekly), anchor, target));
    assert_eq!(weekly.validate(), Err(RuleValidationError::MissingDayOfWeek));

    let monthly: RecurrenceRule = serde_json::from_str(r#"{"type":"monthly"}"#).unwrap();
    assert!(is_due(Some(&monthly), anchor, target));
    assert_eq!(monthly.validate(), Err(RuleValidationError::MissingDayOfMonth));

    let interval: RecurrenceRule = serde_json::from_str(r#"{"type":"every_x_days"}"#).unwrap();
    assert!(is_due(Some(&interval), anchor, day(2024, 1, 3)));
    assert!(!is_due(Some(&interval), anchor, day(2024, 1, 2)));
    assert_eq!(interval.validate(), Err(RuleValidationError::MissingInterval));

    let one_off: RecurrenceRule = serde_json::from_str(r#"{"type":"specific_date"}"#).unwrap();
    assert!(!is_due(Some(&one_off), anchor, target));
    assert_eq!(
        one_off.validate(),
        Err(RuleValidationError::MissingSpecificDate)
    );
}

#[test]
fn out_of_range_days_never_match_and_fail_validation() {
    let anchor = day(2024, 1, 1);
    let weekly = RecurrenceRule::weekly(7);
    assert!(day(2024, 1, 1)
        .iter_days()
        .take(14)
        .all(|target| !is_due(Some(&weekly), anchor, target)));
    assert_eq!(
        weekly.validate(),
        Err(RuleValidationError::DayOfWeekOutOfRange(7))
    );
    assert_eq!(
        RecurrenceRule::monthly(0).validate(),
        Err(RuleValidationError::DayOfMonthOutOfRange(0))
    );
}
