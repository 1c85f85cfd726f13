//! Weekly time arithmetic: days, times of day and slot overlap.

use super::error::ScheduleError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Number of minutes in a day; every `TimeOfDay` is strictly below this.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

// Seconds are accepted but never used.
static TIME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2}):(\d{2})(?::(\d{2}))?$").unwrap());

/// Day of the week, numbered 0 (Sunday) through 6 (Saturday).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum DayOfWeek {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Sunday,
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
    ];

    /// Builds a day from its stored index, rejecting anything outside 0..=6.
    pub fn from_index(value: i64) -> Result<Self, ScheduleError> {
        usize::try_from(value)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .ok_or_else(|| ScheduleError::InvalidDay {
                value: value.to_string(),
            })
    }

    /// Parses a form value such as `"1"` or `" 3 "`.
    pub fn parse(value: &str) -> Result<Self, ScheduleError> {
        let index = value
            .trim()
            .parse::<i64>()
            .map_err(|_| ScheduleError::InvalidDay {
                value: value.to_string(),
            })?;
        Self::from_index(index)
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl TryFrom<i64> for DayOfWeek {
    type Error = ScheduleError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::from_index(value)
    }
}

impl From<DayOfWeek> for i64 {
    fn from(day: DayOfWeek) -> Self {
        day.index() as i64
    }
}

/// A wall-clock time within a single day, stored as minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// Parses `HH:MM` or `HH:MM:SS`; only hours and minutes are kept.
    pub fn parse(value: &str) -> Result<Self, ScheduleError> {
        let invalid = || ScheduleError::InvalidTime {
            value: value.to_string(),
        };

        let caps = TIME_REGEX.captures(value.trim()).ok_or_else(invalid)?;
        let hours: u32 = caps[1].parse().map_err(|_| invalid())?;
        let minutes: u32 = caps[2].parse().map_err(|_| invalid())?;
        if hours > 23 || minutes > 59 {
            return Err(invalid());
        }

        Ok(Self((hours * 60 + minutes) as u16))
    }

    pub fn from_minutes(minutes: u32) -> Result<Self, ScheduleError> {
        if minutes >= MINUTES_PER_DAY {
            return Err(ScheduleError::MinutesOutOfRange { minutes });
        }
        Ok(Self(minutes as u16))
    }

    pub fn minutes(self) -> u32 {
        u32::from(self.0)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = ScheduleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TimeOfDay> for String {
    fn from(time: TimeOfDay) -> Self {
        time.to_string()
    }
}

/// Converts `"14:30"` (or `"14:30:00"`) to minutes since midnight (870).
pub fn time_to_minutes(value: &str) -> Result<u32, ScheduleError> {
    TimeOfDay::parse(value).map(TimeOfDay::minutes)
}

/// Converts minutes since midnight to a zero-padded `HH:MM` string.
///
/// Values past midnight keep counting hours (1450 -> `"24:10"`), which is
/// what a buffered end time looks like when printed.
pub fn minutes_to_time(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Half-open interval overlap: `[start1, end1)` and `[start2, end2)` overlap
/// iff neither ends at or before the other's start.
pub fn overlaps(start1: u32, end1: u32, start2: u32, end2: u32) -> bool {
    !(end1 <= start2 || end2 <= start1)
}

/// Same as [`overlaps`], with `buffer` minutes appended to both end values.
/// Start values are never moved. Buffered ends saturate instead of wrapping.
pub fn overlaps_with_buffer(start1: u32, end1: u32, start2: u32, end2: u32, buffer: u32) -> bool {
    overlaps(
        start1,
        end1.saturating_add(buffer),
        start2,
        end2.saturating_add(buffer),
    )
}

/// One weekly meeting of a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeSlot {
    pub day_of_week: DayOfWeek,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
}

impl TimeSlot {
    pub fn new(day_of_week: DayOfWeek, start_time: TimeOfDay, end_time: TimeOfDay) -> Self {
        Self {
            day_of_week,
            start_time,
            end_time,
        }
    }

    /// Builds a slot from a raw day index and two time strings.
    pub fn parse(day: i64, start: &str, end: &str) -> Result<Self, ScheduleError> {
        Ok(Self::new(
            DayOfWeek::from_index(day)?,
            TimeOfDay::parse(start)?,
            TimeOfDay::parse(end)?,
        ))
    }

    /// True if both slots fall on the same day and their time ranges
    /// overlap once `buffer` minutes are added to each end.
    pub fn collides_with(&self, other: &TimeSlot, buffer: u32) -> bool {
        self.day_of_week == other.day_of_week
            && overlaps_with_buffer(
                self.start_time.minutes(),
                self.end_time.minutes(),
                other.start_time.minutes(),
                other.end_time.minutes(),
                buffer,
            )
    }
}
