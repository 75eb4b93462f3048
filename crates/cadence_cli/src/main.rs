//! Command-line entry point for the rule engine.
//!
//! # Responsibility
//! - Verify `cadence_core` linkage without a host application.
//! - Evaluate a single rule or period lookup from JSON arguments.
//!
//! # Usage
//! - `cadence_cli` prints ping and version.
//! - `cadence_cli due '<rule-json>' YYYY-MM-DD [anchor YYYY-MM-DD]`
//! - `cadence_cli month '<periods-json>' YYYY-MM-DD [closing-day]`

use cadence_core::{
    assign_competence, core_version, is_due, ping, CompetenceFallback, CompetenceSource,
    CutoffPeriod, RecurrenceRule,
};
use chrono::NaiveDate;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let result = match args.first().map(String::as_str) {
        None => {
            println!("cadence_core ping={}", ping());
            println!("cadence_core version={}", core_version());
            Ok(())
        }
        Some("due") => run_due(&args[1..]),
        Some("month") => run_month(&args[1..]),
        Some(other) => Err(format!("unknown command `{other}`; expected due|month")),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::from(2)
        }
    }
}

fn run_due(args: &[String]) -> Result<(), String> {
    let [rule, date, rest @ ..] = args else {
        return Err("usage: due '<rule-json>' YYYY-MM-DD [anchor]".to_string());
    };
    let rule: RecurrenceRule =
        serde_json::from_str(rule).map_err(|err| format!("invalid rule: {err}"))?;
    let date = parse_date(date)?;
    let anchor = due_anchor(&rule, date, rest.first().map(String::as_str))?;

    if let Err(err) = rule.validate() {
        eprintln!("warning: incomplete rule ({}): {err}", err.code());
    }
    println!("{}", is_due(Some(&rule), anchor, date));
    Ok(())
}

/// Anchor for a one-off evaluation.
///
/// An interval rule without `start_date` counts from its anchor, so
/// defaulting the anchor to the target would make every date due.
fn due_anchor(
    rule: &RecurrenceRule,
    date: NaiveDate,
    anchor: Option<&str>,
) -> Result<NaiveDate, String> {
    match (anchor, rule) {
        (Some(raw), _) => parse_date(raw),
        (
            None,
            RecurrenceRule::EveryXDays {
                start_date: None, ..
            },
        ) => Err("every_x_days without start_date needs an anchor date".to_string()),
        (None, _) => Ok(date),
    }
}

fn run_month(args: &[String]) -> Result<(), String> {
    let [periods, date, rest @ ..] = args else {
        return Err("usage: month '<periods-json>' YYYY-MM-DD [closing-day]".to_string());
    };
    let periods: Vec<CutoffPeriod> =
        serde_json::from_str(periods).map_err(|err| format!("invalid periods: {err}"))?;
    let date = parse_date(date)?;
    let fallback = match rest.first() {
        Some(raw) => Some(CompetenceFallback::ClosingDay(
            raw.parse()
                .map_err(|_| format!("invalid closing day `{raw}`"))?,
        )),
        None => None,
    };

    match assign_competence(&periods, date, fallback) {
        Some(assignment) => {
            let source = match assignment.source {
                CompetenceSource::Period(id) => format!("period:{id}"),
                CompetenceSource::Fallback => "fallback".to_string(),
            };
            println!("{} {source}", assignment.competence_month);
        }
        None => println!("none"),
    }
    Ok(())
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|err| format!("invalid date `{raw}`: {err}"))
}

#[cfg(test)]
mod tests {
    use super::due_anchor;
    use cadence_core::RecurrenceRule;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn interval_rule_without_start_requires_anchor() {
        let rule = RecurrenceRule::every_x_days(3, None);
        assert!(due_anchor(&rule, day(2024, 1, 5), None).is_err());
        assert_eq!(
            due_anchor(&rule, day(2024, 1, 5), Some("2024-01-01")).unwrap(),
            day(2024, 1, 1)
        );
    }

    #[test]
    fn other_rules_default_anchor_to_date() {
        let anchored = RecurrenceRule::every_x_days(3, Some(day(2024, 1, 1)));
        assert_eq!(
            due_anchor(&anchored, day(2024, 1, 5), None).unwrap(),
            day(2024, 1, 5)
        );
        assert_eq!(
            due_anchor(&RecurrenceRule::Daily, day(2024, 1, 5), None).unwrap(),
            day(2024, 1, 5)
        );
    }
}
