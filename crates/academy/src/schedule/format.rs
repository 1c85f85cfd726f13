//! Display helpers for conflicts: localized day names and message templates.

use super::types::Conflict;
use serde::{Deserialize, Serialize};

/// Localized names for the days of the week, indexed from Sunday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayNames {
    pub long: [String; 7],
    /// Appended to the raw number when a day index is out of range (e.g. `9요일`)
    #[serde(default)]
    pub fallback_suffix: String,
}

impl DayNames {
    pub fn korean() -> Self {
        Self {
            long: ["일요일", "월요일", "화요일", "수요일", "목요일", "금요일", "토요일"]
                .map(String::from),
            fallback_suffix: "요일".to_string(),
        }
    }

    pub fn english() -> Self {
        Self {
            long: [
                "Sunday",
                "Monday",
                "Tuesday",
                "Wednesday",
                "Thursday",
                "Friday",
                "Saturday",
            ]
            .map(String::from),
            fallback_suffix: String::new(),
        }
    }

    /// Full day name, e.g. `월요일` for 1.
    pub fn day_name(&self, index: usize) -> String {
        self.long
            .get(index)
            .cloned()
            .unwrap_or_else(|| format!("{}{}", index, self.fallback_suffix))
    }
}

impl Default for DayNames {
    fn default() -> Self {
        Self::korean()
    }
}

/// Templates for the per-conflict messages.
///
/// Placeholders: `{class_name}`, `{classroom}`, `{buffer}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageCatalog {
    pub classroom: String,
    pub instructor: String,
}

impl MessageCatalog {
    pub fn korean() -> Self {
        Self {
            classroom: "{class_name} 클래스와 교실({classroom}) 사용 시간이 겹칩니다".to_string(),
            instructor: "{class_name} 클래스와 강사 스케줄이 겹칩니다 (이동시간 {buffer}분 포함)"
                .to_string(),
        }
    }

    pub fn english() -> Self {
        Self {
            classroom: "Classroom {classroom} is already used by {class_name} at this time"
                .to_string(),
            instructor:
                "Instructor already teaches {class_name} at this time ({buffer} min travel included)"
                    .to_string(),
        }
    }

    pub fn classroom_message(&self, class_name: &str, classroom: &str) -> String {
        self.classroom
            .replace("{class_name}", class_name)
            .replace("{classroom}", classroom)
    }

    pub fn instructor_message(&self, class_name: &str, buffer_minutes: u32) -> String {
        self.instructor
            .replace("{class_name}", class_name)
            .replace("{buffer}", &buffer_minutes.to_string())
    }
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self::korean()
    }
}

/// Keeps only the `HH:MM` part of a time string.
pub fn format_time(value: &str) -> &str {
    value.get(..5).unwrap_or(value)
}

/// Renders `"<className> (<day name> <start>-<end>)"`.
pub fn format_conflict_message(conflict: &Conflict, names: &DayNames) -> String {
    let with = &conflict.conflict_with;
    let start = with.start_time.to_string();
    let end = with.end_time.to_string();
    format!(
        "{} ({} {}-{})",
        with.class_name,
        names.day_name(with.day_of_week.index()),
        format_time(&start),
        format_time(&end)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::time::{DayOfWeek, TimeOfDay};
    use crate::schedule::types::{ConflictKind, ConflictWith};

    #[test]
    fn test_day_names() {
        let names = DayNames::korean();
        assert_eq!(names.day_name(0), "일요일");
        assert_eq!(names.day_name(9), "9요일");
        assert_eq!(DayNames::english().day_name(6), "Saturday");
    }

    #[test]
    fn test_format_time_truncates_seconds() {
        assert_eq!(format_time("14:30:00"), "14:30");
        assert_eq!(format_time("9:00"), "9:00");
        assert_eq!(format_time(""), "");
    }

    #[test]
    fn test_format_conflict_message() {
        let conflict = Conflict {
            kind: ConflictKind::Classroom,
            schedule_index: 0,
            conflict_with: ConflictWith {
                class_name: "수학A".to_string(),
                day_of_week: DayOfWeek::Monday,
                start_time: TimeOfDay::parse("14:30:00").unwrap(),
                end_time: TimeOfDay::parse("15:30").unwrap(),
            },
            message: String::new(),
        };
        assert_eq!(
            format_conflict_message(&conflict, &DayNames::korean()),
            "수학A (월요일 14:30-15:30)"
        );
        assert_eq!(
            format_conflict_message(&conflict, &DayNames::english()),
            "수학A (Monday 14:30-15:30)"
        );
    }

    #[test]
    fn test_message_templates() {
        let catalog = MessageCatalog::korean();
        assert_eq!(
            catalog.classroom_message("수학A", "201호"),
            "수학A 클래스와 교실(201호) 사용 시간이 겹칩니다"
        );
        assert_eq!(
            catalog.instructor_message("영어B", 10),
            "영어B 클래스와 강사 스케줄이 겹칩니다 (이동시간 10분 포함)"
        );
    }
}
