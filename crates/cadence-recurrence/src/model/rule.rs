//! RRULE-like rule pattern (the subset of RFC 5545 §3.3.10 the engine stores).

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, Weekday as ChronoWeekday};
use serde::{Deserialize, Serialize};

use super::Repeats;
use crate::error::{RecurrenceError, RecurrenceResult};

/// How often a rule repeats. Only `DAILY`, `WEEKLY` and `MONTHLY` expand;
/// the rest are accepted on input and yield no dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Frequency {
    Secondly,
    Minutely,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    /// Upper-case `FREQ` token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Secondly => "SECONDLY",
            Self::Minutely => "MINUTELY",
            Self::Hourly => "HOURLY",
            Self::Daily => "DAILY",
            Self::Weekly => "WEEKLY",
            Self::Monthly => "MONTHLY",
            Self::Yearly => "YEARLY",
        }
    }

    /// Parses a frequency from a string (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.trim().to_ascii_uppercase().as_str() {
            "SECONDLY" => Self::Secondly,
            "MINUTELY" => Self::Minutely,
            "HOURLY" => Self::Hourly,
            "DAILY" => Self::Daily,
            "WEEKLY" => Self::Weekly,
            "MONTHLY" => Self::Monthly,
            "YEARLY" => Self::Yearly,
            _ => return None,
        })
    }

    /// Provenance tag for dates generated at this frequency.
    #[must_use]
    pub const fn repeats(self) -> Repeats {
        match self {
            Self::Daily => Repeats::Daily,
            Self::Weekly => Repeats::Weekly,
            Self::Monthly => Repeats::Monthly,
            _ => Repeats::Once,
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for Frequency {
    type Error = RecurrenceError;

    fn try_from(value: String) -> RecurrenceResult<Self> {
        Self::parse(&value).ok_or(RecurrenceError::Unsupported(format!("frequency {value:?}")))
    }
}

impl From<Frequency> for String {
    fn from(value: Frequency) -> Self {
        value.as_str().to_string()
    }
}

/// Day of the week as written in a rule (`SU`..`SA`), ordered Sunday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    /// Returns the two-letter abbreviation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sunday => "SU",
            Self::Monday => "MO",
            Self::Tuesday => "TU",
            Self::Wednesday => "WE",
            Self::Thursday => "TH",
            Self::Friday => "FR",
            Self::Saturday => "SA",
        }
    }

    /// Parses a weekday from a two-letter abbreviation (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.to_ascii_uppercase().as_str() {
            "SU" => Self::Sunday,
            "MO" => Self::Monday,
            "TU" => Self::Tuesday,
            "WE" => Self::Wednesday,
            "TH" => Self::Thursday,
            "FR" => Self::Friday,
            "SA" => Self::Saturday,
            _ => return None,
        })
    }

    /// Returns all weekdays in order (Sunday through Saturday).
    #[must_use]
    pub const fn all() -> [Self; 7] {
        [
            Self::Sunday,
            Self::Monday,
            Self::Tuesday,
            Self::Wednesday,
            Self::Thursday,
            Self::Friday,
            Self::Saturday,
        ]
    }

    #[must_use]
    pub const fn to_chrono(self) -> ChronoWeekday {
        match self {
            Self::Sunday => ChronoWeekday::Sun,
            Self::Monday => ChronoWeekday::Mon,
            Self::Tuesday => ChronoWeekday::Tue,
            Self::Wednesday => ChronoWeekday::Wed,
            Self::Thursday => ChronoWeekday::Thu,
            Self::Friday => ChronoWeekday::Fri,
            Self::Saturday => ChronoWeekday::Sat,
        }
    }
}

impl From<ChronoWeekday> for Weekday {
    fn from(value: ChronoWeekday) -> Self {
        match value {
            ChronoWeekday::Sun => Self::Sunday,
            ChronoWeekday::Mon => Self::Monday,
            ChronoWeekday::Tue => Self::Tuesday,
            ChronoWeekday::Wed => Self::Wednesday,
            ChronoWeekday::Thu => Self::Thursday,
            ChronoWeekday::Fri => Self::Friday,
            ChronoWeekday::Sat => Self::Saturday,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for Weekday {
    type Error = RecurrenceError;

    fn try_from(value: String) -> RecurrenceResult<Self> {
        Self::parse(value.trim()).ok_or(RecurrenceError::InvalidWeekday(value))
    }
}

impl From<Weekday> for String {
    fn from(value: Weekday) -> Self {
        value.as_str().to_string()
    }
}

/// Entry of a rule's `byweekday` list, with an optional position in the month.
///
/// The position is limited to -5..=5 without 0, since a month holds at most
/// five of any weekday. Monthly rules honor it (`2TU` is the second Tuesday,
/// `-1FR` the last Friday, a bare `MO` the first Monday); weekly rules drop it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WeekdayNum {
    /// Position in the month, within -5..=5 and never 0.
    pub ordinal: Option<i8>,
    /// The day of the week.
    pub weekday: Weekday,
}

impl WeekdayNum {
    /// Creates a weekday occurrence without an ordinal.
    #[must_use]
    pub const fn every(weekday: Weekday) -> Self {
        Self {
            ordinal: None,
            weekday,
        }
    }

    /// Creates a weekday occurrence with an ordinal, `None` if it is 0 or outside -5..=5.
    #[must_use]
    pub fn nth(ordinal: i8, weekday: Weekday) -> Option<Self> {
        (ordinal != 0 && (-5..=5).contains(&ordinal)).then_some(Self {
            ordinal: Some(ordinal),
            weekday,
        })
    }

    /// Drops the ordinal.
    #[must_use]
    pub const fn without_ordinal(self) -> Self {
        Self::every(self.weekday)
    }
}

impl fmt::Display for WeekdayNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(n) = self.ordinal {
            write!(f, "{n}")?;
        }
        write!(f, "{}", self.weekday)
    }
}

impl FromStr for WeekdayNum {
    type Err = RecurrenceError;

    fn from_str(s: &str) -> RecurrenceResult<Self> {
        let trimmed = s.trim();
        let invalid = || RecurrenceError::InvalidWeekday(trimmed.to_string());

        let split = trimmed.len().checked_sub(2).ok_or_else(invalid)?;
        if !trimmed.is_char_boundary(split) {
            return Err(invalid());
        }
        let (prefix, day) = trimmed.split_at(split);
        let weekday = Weekday::parse(day).ok_or_else(invalid)?;

        if prefix.is_empty() {
            return Ok(Self::every(weekday));
        }
        let ordinal = prefix.parse::<i8>().map_err(|_e| invalid())?;
        Self::nth(ordinal, weekday).ok_or_else(invalid)
    }
}

impl TryFrom<String> for WeekdayNum {
    type Error = RecurrenceError;

    fn try_from(value: String) -> RecurrenceResult<Self> {
        value.parse()
    }
}

impl From<WeekdayNum> for String {
    fn from(value: WeekdayNum) -> Self {
        value.to_string()
    }
}

/// Bounded rule pattern, the RRULE-like persisted representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulePattern {
    pub freq: Frequency,
    pub dtstart: NaiveDate,
    /// Inclusive last date.
    pub until: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub byweekday: Vec<WeekdayNum>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bymonthday: Vec<i8>,
}

impl RulePattern {
    /// Creates a rule with no interval or by-lists.
    #[must_use]
    pub const fn new(freq: Frequency, dtstart: NaiveDate, until: NaiveDate) -> Self {
        Self {
            freq,
            dtstart,
            until,
            interval: None,
            byweekday: Vec::new(),
            bymonthday: Vec::new(),
        }
    }

    /// Weekly rule on the given weekdays.
    #[must_use]
    pub fn weekly(dtstart: NaiveDate, until: NaiveDate, weekdays: &[Weekday]) -> Self {
        Self {
            byweekday: weekdays.iter().copied().map(WeekdayNum::every).collect(),
            ..Self::new(Frequency::Weekly, dtstart, until)
        }
    }

    /// Sets the interval.
    #[must_use]
    pub fn with_interval(mut self, interval: u32) -> Self {
        self.interval = Some(interval);
        self
    }

    /// Sets the by-weekday list.
    #[must_use]
    pub fn with_byweekday(mut self, days: Vec<WeekdayNum>) -> Self {
        self.byweekday = days;
        self
    }

    /// Sets the by-monthday list.
    #[must_use]
    pub fn with_bymonthday(mut self, days: Vec<i8>) -> Self {
        self.bymonthday = days;
        self
    }

    /// Effective interval; absent or zero means 1.
    #[must_use]
    pub fn step(&self) -> u32 {
        self.interval.filter(|&n| n > 0).unwrap_or(1)
    }

    /// `DTSTART` and `RRULE` lines for this rule, anchored at midnight UTC.
    #[must_use]
    pub fn to_rrule_set_text(&self) -> String {
        format!("DTSTART:{}\nRRULE:{self}", rfc5545_midnight(self.dtstart))
    }
}

fn rfc5545_midnight(date: NaiveDate) -> String {
    format!("{}T000000Z", date.format("%Y%m%d"))
}

impl fmt::Display for RulePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = vec![format!("FREQ={}", self.freq)];

        if self.step() != 1 {
            parts.push(format!("INTERVAL={}", self.step()));
        }

        parts.push(format!("UNTIL={}", rfc5545_midnight(self.until)));

        if !self.byweekday.is_empty() {
            let s: Vec<_> = self.byweekday.iter().map(ToString::to_string).collect();
            parts.push(format!("BYDAY={}", s.join(",")));
        }

        if !self.bymonthday.is_empty() {
            let s: Vec<_> = self.bymonthday.iter().map(ToString::to_string).collect();
            parts.push(format!("BYMONTHDAY={}", s.join(",")));
        }

        write!(f, "{}", parts.join(";"))
    }
}
