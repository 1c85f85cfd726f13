//! Validation of schedule rows as entered on the class form.

use super::error::DraftError;
use super::time::{DayOfWeek, TimeOfDay, TimeSlot};
use serde::{Deserialize, Serialize};

/// One schedule row as submitted by the form. Fields may be blank while
/// the user is still filling the row in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleDraft {
    #[serde(default, deserialize_with = "string_or_number")]
    pub day_of_week: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
}

impl ScheduleDraft {
    pub fn new(
        day_of_week: impl Into<String>,
        start: impl Into<String>,
        end: impl Into<String>,
    ) -> Self {
        Self {
            day_of_week: day_of_week.into(),
            start_time: start.into(),
            end_time: end.into(),
        }
    }

    /// True once day, start and end are all filled in.
    pub fn is_complete(&self) -> bool {
        !self.day_of_week.trim().is_empty()
            && !self.start_time.trim().is_empty()
            && !self.end_time.trim().is_empty()
    }
}

/// Turns the complete rows of a form into slots.
///
/// Incomplete rows are skipped. Row numbers in errors are 1-based and count
/// only complete rows, matching what the form shows.
pub fn parse_drafts(drafts: &[ScheduleDraft]) -> Result<Vec<TimeSlot>, DraftError> {
    let slots = complete_slots(drafts)?;
    if slots.is_empty() {
        return Err(DraftError::Empty);
    }

    for (i, slot) in slots.iter().enumerate() {
        if slot.start_time >= slot.end_time {
            return Err(DraftError::StartNotBeforeEnd { row: i + 1 });
        }
    }

    Ok(slots)
}

/// Parses the complete rows without requiring any, for live checking while
/// the form is being edited.
pub fn complete_slots(drafts: &[ScheduleDraft]) -> Result<Vec<TimeSlot>, DraftError> {
    drafts
        .iter()
        .filter(|d| d.is_complete())
        .enumerate()
        .map(|(i, d)| {
            parse_row(d).map_err(|source| DraftError::Invalid { row: i + 1, source })
        })
        .collect()
}

fn parse_row(draft: &ScheduleDraft) -> Result<TimeSlot, super::error::ScheduleError> {
    Ok(TimeSlot::new(
        DayOfWeek::parse(&draft.day_of_week)?,
        TimeOfDay::parse(&draft.start_time)?,
        TimeOfDay::parse(&draft.end_time)?,
    ))
}

/// Forms send the day either as `"1"` or as `1`.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}
