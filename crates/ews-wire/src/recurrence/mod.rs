//! The composite recurrence rule.
//!
//! A recurrence is two independent variant groups: six type members (how
//! occurrences repeat) and three end members (when they stop). Exactly one
//! member of each group may be configured; the rule is validated lazily at
//! the point of use, not at set time, so a record under construction may
//! legitimately hold a partially filled pattern.

mod pattern;

use thiserror::Error;

pub use pattern::Recurrence;

/// Validation errors raised when a recurrence configuration is read or
/// serialized.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecurrenceError {
    #[error("no recurrence type is configured")]
    MissingRecurrenceType,

    #[error("more than one recurrence type is configured")]
    AmbiguousRecurrenceType,

    #[error("no recurrence end is configured")]
    MissingEndType,

    #[error("more than one recurrence end is configured")]
    AmbiguousEndType,
}
