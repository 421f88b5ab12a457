//! Inference over a list of concrete dates: which pattern they form and
//! whether they share a single time slot.

mod classifier;
mod consistency;

pub use classifier::{detect_recurring_pattern_type, week_interval};
pub use consistency::{ConsistencyReport, check_time_consistency};
