//! Weekly schedule model and conflict detection for classes.
//!
//! Candidate schedules are checked against the active classes that share a
//! classroom or an instructor before a class is created or edited. The
//! checker only ever reads from the store.

mod checker;
mod config;
mod draft;
mod error;
mod format;
mod time;
mod types;

pub use checker::ConflictChecker;
pub use config::{CheckerConfig, DEFAULT_INSTRUCTOR_BUFFER_MINUTES};
pub use draft::{complete_slots, parse_drafts, ScheduleDraft};
pub use error::{DraftError, ScheduleError};
pub use format::{format_conflict_message, format_time, DayNames, MessageCatalog};
pub use time::{
    minutes_to_time, overlaps, overlaps_with_buffer, time_to_minutes, DayOfWeek, TimeOfDay,
    TimeSlot, MINUTES_PER_DAY,
};
pub use types::*;
