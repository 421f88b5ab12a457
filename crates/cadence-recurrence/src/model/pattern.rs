use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Frequency, Repeats};

/// Classification of a set of concrete dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternKind {
    Daily,
    Weekly,
    Monthly,
    Custom,
}

impl PatternKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Custom => "custom",
        }
    }

    /// The simple pattern this classification maps to, `None` for `custom`.
    #[must_use]
    pub const fn as_recurring(self) -> Option<RecurringPattern> {
        match self {
            Self::Daily => Some(RecurringPattern::Daily),
            Self::Weekly => Some(RecurringPattern::Weekly),
            Self::Monthly => Some(RecurringPattern::Monthly),
            Self::Custom => None,
        }
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Step of a simple pattern: one day, one week or one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurringPattern {
    Daily,
    Weekly,
    Monthly,
}

impl RecurringPattern {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    /// Parses a pattern name (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Self::Daily,
            "weekly" => Self::Weekly,
            "monthly" => Self::Monthly,
            _ => return None,
        })
    }

    #[must_use]
    pub const fn repeats(self) -> Repeats {
        match self {
            Self::Daily => Repeats::Daily,
            Self::Weekly => Repeats::Weekly,
            Self::Monthly => Repeats::Monthly,
        }
    }

    #[must_use]
    pub const fn frequency(self) -> Frequency {
        match self {
            Self::Daily => Frequency::Daily,
            Self::Weekly => Frequency::Weekly,
            Self::Monthly => Frequency::Monthly,
        }
    }
}

impl From<RecurringPattern> for PatternKind {
    fn from(value: RecurringPattern) -> Self {
        match value {
            RecurringPattern::Daily => Self::Daily,
            RecurringPattern::Weekly => Self::Weekly,
            RecurringPattern::Monthly => Self::Monthly,
        }
    }
}

impl fmt::Display for RecurringPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
