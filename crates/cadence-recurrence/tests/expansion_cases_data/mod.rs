use cadence_recurrence::{PersistedRecurrence, Repeats, expand};

pub struct ExpansionCase {
    pub name: &'static str,
    pub payload: &'static str,
    pub expected: &'static [&'static str],
    pub repeats: Repeats,
}

#[expect(clippy::too_many_lines)]
pub fn expansion_cases() -> Vec<ExpansionCase> {
    vec![
        ExpansionCase {
            name: "explicit_iso_dates",
            payload: r#"{"eventDates":[
                {"date":"2025-03-02","startTime":"10:00","endTime":"11:00"},
                {"date":"2025-03-01T00:00:00.000Z","startTime":"10:00","endTime":"11:00"}
            ]}"#,
            expected: &["2025-03-01", "2025-03-02"],
            repeats: Repeats::Once,
        },
        ExpansionCase {
            name: "explicit_timestamp_string",
            payload: r#"{"eventDates":[{"date":"1740787200000"}]}"#,
            expected: &["2025-03-01"],
            repeats: Repeats::Once,
        },
        ExpansionCase {
            name: "explicit_drops_unreadable_rows",
            payload: r#"{"eventDates":[{"date":"soon"},{"date":"2025-03-01"},{"date":null}]}"#,
            expected: &["2025-03-01"],
            repeats: Repeats::Once,
        },
        ExpansionCase {
            name: "explicit_drops_non_scalar_dates",
            payload: r#"{"eventDates":[
                {"date":"2025-01-06","startTime":"09:00","endTime":"10:00"},
                {"date":true},
                {"date":{"year":2025},"startTime":"11:00"},
                {"date":["2025-01-07"]}
            ]}"#,
            expected: &["2025-01-06"],
            repeats: Repeats::Once,
        },
        ExpansionCase {
            name: "simple_daily",
            payload: r#"{"recurringPattern":"daily","recurringStart":"2025-02-27","recurringEnd":"2025-03-02",
                "times":[{"startTime":"07:00","endTime":"08:00"}]}"#,
            expected: &["2025-02-27", "2025-02-28", "2025-03-01", "2025-03-02"],
            repeats: Repeats::Daily,
        },
        ExpansionCase {
            name: "simple_weekly_end_not_on_step",
            payload: r#"{"recurringPattern":"weekly","recurringStart":"2025-03-03","recurringEnd":"2025-03-20"}"#,
            expected: &["2025-03-03", "2025-03-10", "2025-03-17"],
            repeats: Repeats::Weekly,
        },
        ExpansionCase {
            name: "simple_monthly_from_30th",
            payload: r#"{"recurringPattern":"Monthly","recurringStart":"2025-01-30","recurringEnd":"2025-04-30"}"#,
            expected: &["2025-01-30", "2025-02-28", "2025-03-30", "2025-04-30"],
            repeats: Repeats::Monthly,
        },
        ExpansionCase {
            name: "simple_pattern_end_before_start",
            payload: r#"{"recurringPattern":"daily","recurringStart":"2025-03-05","recurringEnd":"2025-03-01"}"#,
            expected: &[],
            repeats: Repeats::Daily,
        },
        ExpansionCase {
            name: "rule_daily",
            payload: r#"{"rrulePattern":{"freq":"DAILY","dtstart":"2025-03-01","until":"2025-03-03"}}"#,
            expected: &["2025-03-01", "2025-03-02", "2025-03-03"],
            repeats: Repeats::Daily,
        },
        ExpansionCase {
            name: "rule_weekly_every_other_week",
            payload: r#"{"rrulePattern":{"freq":"WEEKLY","dtstart":"2025-03-03","until":"2025-03-31",
                "interval":2,"byweekday":["MO","TH"]}}"#,
            expected: &["2025-03-03", "2025-03-06", "2025-03-17", "2025-03-20", "2025-03-31"],
            repeats: Repeats::Weekly,
        },
        ExpansionCase {
            name: "rule_weekly_numeric_weekdays",
            payload: r#"{"rrulePattern":{"freq":"WEEKLY","dtstart":"2025-03-03","until":"2025-03-09",
                "byweekday":[0, 6]}}"#,
            expected: &["2025-03-03", "2025-03-09"],
            repeats: Repeats::Weekly,
        },
        ExpansionCase {
            name: "rule_weekly_defaults_to_start_weekday",
            payload: r#"{"rrulePattern":{"freq":"WEEKLY","dtstart":"2025-03-05","until":"2025-03-19"}}"#,
            expected: &["2025-03-05", "2025-03-12", "2025-03-19"],
            repeats: Repeats::Weekly,
        },
        ExpansionCase {
            name: "rule_monthly_day_30_skips_february",
            payload: r#"{"rrulePattern":{"freq":"MONTHLY","dtstart":"2025-01-01","until":"2025-04-30",
                "bymonthday":[30]}}"#,
            expected: &["2025-01-30", "2025-03-30", "2025-04-30"],
            repeats: Repeats::Monthly,
        },
        ExpansionCase {
            name: "rule_monthly_last_day",
            payload: r#"{"rrulePattern":{"freq":"MONTHLY","dtstart":"2025-01-01","until":"2025-03-31",
                "bymonthday":[-1]}}"#,
            expected: &["2025-01-31", "2025-02-28", "2025-03-31"],
            repeats: Repeats::Monthly,
        },
        ExpansionCase {
            name: "rule_monthly_first_weekday",
            payload: r#"{"rrule":{"freq":"MONTHLY","dtstart":"2025-03-01","until":"2025-05-31",
                "byweekday":["MO"]}}"#,
            expected: &["2025-03-03", "2025-04-07", "2025-05-05"],
            repeats: Repeats::Monthly,
        },
        ExpansionCase {
            name: "rule_timestamp_bounds",
            payload: r#"{"rrulePattern":{"freq":"DAILY","dtstart":1740787200000,"until":"1740873600000"}}"#,
            expected: &["2025-03-01", "2025-03-02"],
            repeats: Repeats::Daily,
        },
        ExpansionCase {
            name: "rule_missing_until",
            payload: r#"{"rrulePattern":{"freq":"DAILY","dtstart":"2025-03-01"}}"#,
            expected: &[],
            repeats: Repeats::Daily,
        },
        ExpansionCase {
            name: "no_recurrence_fields",
            payload: r#"{"title":"standup"}"#,
            expected: &[],
            repeats: Repeats::Once,
        },
    ]
}

pub fn assert_case(case: &ExpansionCase) {
    let payload: PersistedRecurrence = serde_json::from_str(case.payload)
        .unwrap_or_else(|e| panic!("{}: payload does not parse: {e}", case.name));

    let dates = expand(&payload);
    let actual: Vec<String> = dates.iter().map(|d| d.date.to_string()).collect();
    assert_eq!(actual, case.expected, "{}", case.name);
    assert!(
        dates.iter().all(|d| d.repeats == case.repeats),
        "{}: unexpected repeats tag",
        case.name
    );
}
