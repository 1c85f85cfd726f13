//! Error types for schedule parsing and candidate validation.

use thiserror::Error;

/// Errors raised while turning raw day/time values into schedule value types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// Day of week outside 0 (Sunday) ..= 6 (Saturday)
    #[error("Invalid day of week: {value}")]
    InvalidDay { value: String },

    /// Time string that is not a zero-padded 24-hour `HH:MM[:SS]`
    #[error("Invalid time '{value}': expected HH:MM")]
    InvalidTime { value: String },

    /// Minute count that does not fit within a single day
    #[error("Minutes out of range: {minutes} (must be below 1440)")]
    MinutesOutOfRange { minutes: u32 },
}

/// Errors raised while validating the schedule rows of a class form.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DraftError {
    /// No row had all of day, start and end filled in
    #[error("At least one complete schedule row is required")]
    Empty,

    /// A row could not be parsed (row numbers are 1-based)
    #[error("Schedule row {row}: {source}")]
    Invalid {
        row: usize,
        #[source]
        source: ScheduleError,
    },

    /// A row whose start is not strictly before its end (row numbers are 1-based)
    #[error("Schedule row {row}: start time must be before end time")]
    StartNotBeforeEnd { row: usize },
}

impl DraftError {
    /// Returns the 1-based row the error refers to, if any.
    pub fn row(&self) -> Option<usize> {
        match self {
            DraftError::Empty => None,
            DraftError::Invalid { row, .. } | DraftError::StartNotBeforeEnd { row } => Some(*row),
        }
    }
}
