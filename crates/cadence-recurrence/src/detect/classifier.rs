use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate};

use crate::model::{PatternKind, RecurringDate, Repeats, Weekday, week_start, weekday_position};

/// ## Summary
/// Classifies a list of dates as `daily`, `weekly`, `monthly` or `custom`.
///
/// A uniform provenance tag (ignoring `once`) wins over inference. Otherwise
/// the sorted dates are checked for a daily run, then a weekly shape, then a
/// shared day-of-month, then a shared weekday position such as "second
/// Friday". Fewer than two dates are always `custom`.
#[must_use]
pub fn detect_recurring_pattern_type(dates: &[RecurringDate]) -> PatternKind {
    if dates.len() < 2 {
        return PatternKind::Custom;
    }

    if let Some(kind) = uniform_provenance(dates) {
        tracing::trace!(pattern = %kind, "Pattern taken from provenance tags");
        return kind;
    }

    let mut sorted: Vec<NaiveDate> = dates.iter().map(|d| d.date).collect();
    sorted.sort_unstable();

    let kind = if is_daily(&sorted) {
        PatternKind::Daily
    } else if is_weekly(&sorted) {
        PatternKind::Weekly
    } else if is_monthly(&sorted) {
        PatternKind::Monthly
    } else {
        PatternKind::Custom
    };
    tracing::trace!(pattern = %kind, count = sorted.len(), "Pattern inferred from dates");
    kind
}

fn uniform_provenance(dates: &[RecurringDate]) -> Option<PatternKind> {
    let mut tags = dates
        .iter()
        .map(|d| d.repeats)
        .filter(|&tag| tag != Repeats::Once);
    let first = tags.next()?;
    if !tags.all(|tag| tag == first) {
        return None;
    }

    match first {
        Repeats::Daily => Some(PatternKind::Daily),
        Repeats::Weekly => Some(PatternKind::Weekly),
        Repeats::Monthly => Some(PatternKind::Monthly),
        Repeats::Once => None,
    }
}

fn is_daily(sorted: &[NaiveDate]) -> bool {
    sorted
        .windows(2)
        .all(|pair| (pair[1] - pair[0]).num_days() == 1)
}

fn is_weekly(sorted: &[NaiveDate]) -> bool {
    single_weekday(sorted) || stable_weekdays_per_week(sorted)
}

/// Same weekday throughout, so every gap is a whole number of weeks.
fn single_weekday(sorted: &[NaiveDate]) -> bool {
    let first = sorted[0].weekday();
    sorted.iter().all(|d| d.weekday() == first)
}

/// Two or more weekdays, and every Monday-started week holds the same set of
/// weekdays as the first one. Weeks may be skipped.
fn stable_weekdays_per_week(sorted: &[NaiveDate]) -> bool {
    let mut weeks: BTreeMap<NaiveDate, BTreeSet<Weekday>> = BTreeMap::new();
    for date in sorted {
        weeks
            .entry(week_start(*date))
            .or_default()
            .insert(Weekday::from(date.weekday()));
    }

    let mut groups = weeks.values();
    let Some(first) = groups.next() else {
        return false;
    };
    first.len() > 1 && groups.all(|group| group == first)
}

/// ## Summary
/// Number of weeks between consecutive occupied weeks, if it is constant.
///
/// Weeks start on Monday. A single occupied week yields `Some(1)`; dates
/// that repeat within a week but skip irregularly between weeks yield `None`.
#[must_use]
pub fn week_interval(dates: &[NaiveDate]) -> Option<u32> {
    let weeks: BTreeSet<NaiveDate> = dates.iter().copied().map(week_start).collect();
    let starts: Vec<NaiveDate> = weeks.into_iter().collect();

    let mut gaps = starts
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).num_weeks());
    let Some(first) = gaps.next() else {
        return (!starts.is_empty()).then_some(1);
    };
    if !gaps.all(|gap| gap == first) {
        return None;
    }
    u32::try_from(first).ok()
}

fn is_monthly(sorted: &[NaiveDate]) -> bool {
    let first = sorted[0];
    let same_day_of_month = sorted.iter().all(|d| d.day() == first.day());
    if same_day_of_month {
        return true;
    }

    let position = (first.weekday(), weekday_position(first));
    sorted
        .iter()
        .all(|d| (d.weekday(), weekday_position(*d)) == position)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ClockTime, TimeWindow};

    fn dates(values: &[&str], repeats: Repeats) -> Vec<RecurringDate> {
        let window = TimeWindow::new(ClockTime::hm(9, 0), ClockTime::hm(10, 0));
        values
            .iter()
            .map(|v| {
                let date = NaiveDate::parse_from_str(v, "%Y-%m-%d").expect("valid date");
                RecurringDate::single(date, repeats, window)
            })
            .collect()
    }

    #[test]
    fn fewer_than_two_is_custom() {
        assert_eq!(detect_recurring_pattern_type(&[]), PatternKind::Custom);
        assert_eq!(
            detect_recurring_pattern_type(&dates(&["2025-01-06"], Repeats::Weekly)),
            PatternKind::Custom
        );
    }

    #[test]
    fn provenance_wins_over_inference() {
        // Consecutive days, but generated as "weekly".
        let input = dates(&["2025-01-06", "2025-01-07", "2025-01-08"], Repeats::Weekly);
        assert_eq!(detect_recurring_pattern_type(&input), PatternKind::Weekly);
    }

    #[test]
    fn once_tags_are_ignored_for_provenance() {
        let mut input = dates(&["2025-01-06", "2025-01-09"], Repeats::Monthly);
        input.extend(dates(&["2025-01-20"], Repeats::Once));
        assert_eq!(detect_recurring_pattern_type(&input), PatternKind::Monthly);
    }

    #[test]
    fn mixed_tags_fall_back_to_inference() {
        let mut input = dates(&["2025-01-06"], Repeats::Weekly);
        input.extend(dates(&["2025-01-07", "2025-01-08"], Repeats::Daily));
        assert_eq!(detect_recurring_pattern_type(&input), PatternKind::Daily);
    }

    #[test]
    fn infers_daily_regardless_of_order() {
        let input = dates(&["2025-01-08", "2025-01-06", "2025-01-07"], Repeats::Once);
        assert_eq!(detect_recurring_pattern_type(&input), PatternKind::Daily);
    }

    #[test]
    fn infers_weekly_single_weekday() {
        let input = dates(&["2025-01-06", "2025-01-20", "2025-01-13"], Repeats::Once);
        assert_eq!(detect_recurring_pattern_type(&input), PatternKind::Weekly);
    }

    #[test]
    fn infers_weekly_every_other_week() {
        let input = dates(&["2025-01-06", "2025-01-20", "2025-02-03"], Repeats::Once);
        assert_eq!(detect_recurring_pattern_type(&input), PatternKind::Weekly);
    }

    #[test]
    fn unevenly_spaced_weekday_is_still_weekly() {
        // Mondays with gaps of one and two weeks.
        let input = dates(&["2025-01-06", "2025-01-13", "2025-01-27"], Repeats::Once);
        assert_eq!(detect_recurring_pattern_type(&input), PatternKind::Weekly);
    }

    #[test]
    fn stable_weekdays_with_skipped_week_are_weekly() {
        // Mon+Wed, a week off, Mon+Wed again.
        let input = dates(
            &["2025-01-06", "2025-01-08", "2025-01-13", "2025-01-15", "2025-01-27", "2025-01-29"],
            Repeats::Once,
        );
        assert_eq!(detect_recurring_pattern_type(&input), PatternKind::Weekly);
    }

    #[test]
    fn week_interval_counts_weeks_between_groups() {
        let parse = |v: &str| NaiveDate::parse_from_str(v, "%Y-%m-%d").expect("valid date");
        let every_other = [
            parse("2025-01-06"),
            parse("2025-01-08"),
            parse("2025-01-20"),
            parse("2025-01-22"),
        ];
        assert_eq!(week_interval(&every_other), Some(2));

        let one_week = [parse("2025-01-06"), parse("2025-01-08")];
        assert_eq!(week_interval(&one_week), Some(1));

        let uneven = [parse("2025-01-06"), parse("2025-01-13"), parse("2025-01-27")];
        assert_eq!(week_interval(&uneven), None);
        assert_eq!(week_interval(&[]), None);
    }

    #[test]
    fn infers_weekly_multi_weekday() {
        let input = dates(
            &[
                "2025-01-06",
                "2025-01-08",
                "2025-01-13",
                "2025-01-15",
                "2025-01-20",
                "2025-01-22",
            ],
            Repeats::Once,
        );
        assert_eq!(detect_recurring_pattern_type(&input), PatternKind::Weekly);
    }

    #[test]
    fn unstable_weekdays_are_not_weekly() {
        // Mon+Wed, then Mon+Thu.
        let input = dates(
            &["2025-01-06", "2025-01-08", "2025-01-13", "2025-01-16"],
            Repeats::Once,
        );
        assert_eq!(detect_recurring_pattern_type(&input), PatternKind::Custom);
    }

    #[test]
    fn infers_monthly_day_of_month() {
        let input = dates(&["2025-01-15", "2025-02-15", "2025-03-15"], Repeats::Once);
        assert_eq!(detect_recurring_pattern_type(&input), PatternKind::Monthly);
    }

    #[test]
    fn shared_weekday_wins_over_weekday_position() {
        // Second Friday of January, March and May 2025.
        let input = dates(&["2025-01-10", "2025-03-14", "2025-05-09"], Repeats::Once);
        assert_eq!(detect_recurring_pattern_type(&input), PatternKind::Weekly);
    }

    #[test]
    fn monthly_check_matches_weekday_position() {
        let parse = |v: &str| NaiveDate::parse_from_str(v, "%Y-%m-%d").expect("valid date");
        let second_fridays = [parse("2025-01-10"), parse("2025-03-14"), parse("2025-05-09")];
        assert!(is_monthly(&second_fridays));

        let mixed = [parse("2025-01-10"), parse("2025-03-21")];
        assert!(!is_monthly(&mixed));
    }

    #[test]
    fn irregular_dates_are_custom() {
        let input = dates(&["2025-01-06", "2025-01-09", "2025-02-17"], Repeats::Once);
        assert_eq!(detect_recurring_pattern_type(&input), PatternKind::Custom);
    }
}
