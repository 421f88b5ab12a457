//! Time slots attached to a single calendar date.

use serde::{Deserialize, Serialize};

use super::{ClockTime, TimeWindow, new_id};

const MINUTES_PER_DAY: u32 = 24 * 60;

/// One start/end pair on a date, with its derived display duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawTimeSlot")]
pub struct TimeSlot {
    pub id: String,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    /// Display string such as `1h 30m`. Recomputed by [`TimeSlot::set_times`].
    pub duration: String,
}

/// Incoming slot; id and duration are optional and filled in on conversion.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTimeSlot {
    #[serde(default = "new_id")]
    id: String,
    start_time: ClockTime,
    end_time: ClockTime,
}

impl From<RawTimeSlot> for TimeSlot {
    fn from(raw: RawTimeSlot) -> Self {
        Self::with_id(raw.id, raw.start_time, raw.end_time)
    }
}

impl TimeSlot {
    /// Creates a slot with a fresh id.
    #[must_use]
    pub fn new(start_time: ClockTime, end_time: ClockTime) -> Self {
        Self::with_id(new_id(), start_time, end_time)
    }

    #[must_use]
    pub fn with_id(id: impl Into<String>, start_time: ClockTime, end_time: ClockTime) -> Self {
        Self {
            id: id.into(),
            start_time,
            end_time,
            duration: calculate_duration(start_time, end_time),
        }
    }

    #[must_use]
    pub fn from_window(window: TimeWindow) -> Self {
        Self::new(window.start_time, window.end_time)
    }

    /// Replaces start and end and recomputes the duration.
    pub fn set_times(&mut self, start_time: ClockTime, end_time: ClockTime) {
        self.start_time = start_time;
        self.end_time = end_time;
        self.duration = calculate_duration(start_time, end_time);
    }

    #[must_use]
    pub const fn window(&self) -> TimeWindow {
        TimeWindow::new(self.start_time, self.end_time)
    }

    /// Length in minutes; an end at or before the start wraps into the next day.
    #[must_use]
    pub fn duration_minutes(&self) -> u32 {
        duration_minutes(self.start_time, self.end_time)
    }
}

fn duration_minutes(start: ClockTime, end: ClockTime) -> u32 {
    let start = start.minutes_from_midnight();
    let end = end.minutes_from_midnight();
    if end < start {
        end + MINUTES_PER_DAY - start
    } else {
        end - start
    }
}

/// ## Summary
/// Formats the span between two times of day as `2h`, `45m` or `1h 30m`.
///
/// An end earlier than the start is an overnight slot and wraps past midnight
/// instead of going negative. Identical times yield `0m`.
#[must_use]
pub fn calculate_duration(start: ClockTime, end: ClockTime) -> String {
    let total = duration_minutes(start, end);
    let hours = total / 60;
    let minutes = total % 60;

    match (hours, minutes) {
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}m"),
    }
}

/// ## Summary
/// Finds slots that overlap their successor once sorted by start time.
///
/// Returns the `(earlier, later)` id pairs. Only adjacent slots are compared,
/// so a long slot swallowing two shorter ones reports the first pair only.
#[must_use]
pub fn find_overlapping_slots(slots: &[TimeSlot]) -> Vec<(String, String)> {
    let mut sorted: Vec<&TimeSlot> = slots.iter().collect();
    sorted.sort_by_key(|slot| slot.start_time);

    sorted
        .windows(2)
        .filter(|pair| pair[0].end_time > pair[1].start_time)
        .map(|pair| (pair[0].id.clone(), pair[1].id.clone()))
        .collect()
}

#[must_use]
pub fn has_overlapping_slots(slots: &[TimeSlot]) -> bool {
    !find_overlapping_slots(slots).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> ClockTime {
        s.parse().expect("valid time")
    }

    #[test]
    fn duration_whole_hours() {
        assert_eq!(calculate_duration(t("09:00"), t("11:00")), "2h");
    }

    #[test]
    fn duration_minutes_only() {
        assert_eq!(calculate_duration(t("09:00"), t("09:45")), "45m");
    }

    #[test]
    fn duration_mixed() {
        assert_eq!(calculate_duration(t("09:00"), t("10:30")), "1h 30m");
    }

    #[test]
    fn duration_overnight_wraps() {
        assert_eq!(calculate_duration(t("23:00"), t("01:00")), "2h");
        assert_eq!(calculate_duration(t("22:15"), t("00:00")), "1h 45m");
    }

    #[test]
    fn duration_zero() {
        assert_eq!(calculate_duration(t("12:00"), t("12:00")), "0m");
    }

    #[test]
    fn set_times_recomputes_duration() {
        let mut slot = TimeSlot::with_id("a", t("09:00"), t("10:00"));
        assert_eq!(slot.duration, "1h");

        slot.set_times(t("13:00"), t("15:15"));
        assert_eq!(slot.duration, "2h 15m");
        assert_eq!(slot.duration_minutes(), 135);
    }

    #[test]
    fn overlap_detection_sorts_first() {
        let slots = vec![
            TimeSlot::with_id("late", t("10:30"), t("12:00")),
            TimeSlot::with_id("early", t("09:00"), t("11:00")),
            TimeSlot::with_id("evening", t("18:00"), t("19:00")),
        ];

        assert_eq!(
            find_overlapping_slots(&slots),
            vec![("early".to_string(), "late".to_string())]
        );
        assert!(has_overlapping_slots(&slots));
    }

    #[test]
    fn touching_slots_do_not_overlap() {
        let slots = vec![
            TimeSlot::with_id("a", t("09:00"), t("10:00")),
            TimeSlot::with_id("b", t("10:00"), t("11:00")),
        ];
        assert!(!has_overlapping_slots(&slots));
    }

    #[test]
    fn deserialize_fills_missing_id_and_duration() {
        let slot: TimeSlot =
            serde_json::from_str(r#"{"startTime":"09:00","endTime":"10:00"}"#).expect("valid");
        assert!(!slot.id.is_empty());
        assert_eq!(slot.duration, "1h");
    }
}
