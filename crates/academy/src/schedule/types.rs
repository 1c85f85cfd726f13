/// Types for class schedules and conflict reports
use super::time::{DayOfWeek, TimeOfDay, TimeSlot};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a class row in the store.
pub type ClassId = i64;

/// Lifecycle status of a class. Only `Active` classes take part in
/// conflict detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ClassStatus {
    #[default]
    Active,
    Inactive,
    Preparing,
}

impl ClassStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ClassStatus::Active => "active",
            ClassStatus::Inactive => "inactive",
            ClassStatus::Preparing => "preparing",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(ClassStatus::Active),
            "inactive" => Some(ClassStatus::Inactive),
            "preparing" => Some(ClassStatus::Preparing),
            _ => None,
        }
    }
}

impl fmt::Display for ClassStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An existing class together with its weekly schedule, as read from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingClass {
    pub id: ClassId,
    pub name: String,
    pub classroom: Option<String>,
    pub main_instructor_id: Option<String>,
    pub status: ClassStatus,
    pub schedules: Vec<TimeSlot>,
}

/// Which resource two slots are competing for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictKind {
    Classroom,
    Instructor,
}

/// The existing slot a candidate collided with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictWith {
    pub class_name: String,
    pub day_of_week: DayOfWeek,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
}

/// A single (existing slot, candidate slot) collision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    #[serde(rename = "type")]
    pub kind: ConflictKind,
    /// Index into the candidate schedule list supplied by the caller
    pub schedule_index: usize,
    pub conflict_with: ConflictWith,
    pub message: String,
}

/// Result of one conflict check.
///
/// A failed lookup is reported as `CheckFailed` rather than folded into
/// `NoConflicts`, so callers can tell "verified free" apart from
/// "could not verify".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum CheckOutcome {
    NoConflicts,
    Conflicts(Vec<Conflict>),
    CheckFailed { reason: String },
}

impl CheckOutcome {
    /// Wraps a list of conflicts, collapsing an empty list to `NoConflicts`.
    pub fn from_conflicts(conflicts: Vec<Conflict>) -> Self {
        if conflicts.is_empty() {
            CheckOutcome::NoConflicts
        } else {
            CheckOutcome::Conflicts(conflicts)
        }
    }

    pub fn has_conflict(&self) -> bool {
        matches!(self, CheckOutcome::Conflicts(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, CheckOutcome::CheckFailed { .. })
    }

    /// Conflicts found, or an empty slice for the other two states.
    pub fn conflicts(&self) -> &[Conflict] {
        match self {
            CheckOutcome::Conflicts(conflicts) => conflicts,
            _ => &[],
        }
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            CheckOutcome::CheckFailed { reason } => Some(reason),
            _ => None,
        }
    }
}

/// Combined classroom and instructor check results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleConflictReport {
    pub classroom: CheckOutcome,
    pub instructor: CheckOutcome,
}

impl ScheduleConflictReport {
    pub fn has_conflict(&self) -> bool {
        self.classroom.has_conflict() || self.instructor.has_conflict()
    }

    /// All conflicts: classroom conflicts first, then instructor conflicts.
    pub fn conflicts(&self) -> Vec<Conflict> {
        self.classroom
            .conflicts()
            .iter()
            .chain(self.instructor.conflicts())
            .cloned()
            .collect()
    }

    pub fn classroom_conflicts(&self) -> &[Conflict] {
        self.classroom.conflicts()
    }

    pub fn instructor_conflicts(&self) -> &[Conflict] {
        self.instructor.conflicts()
    }

    /// Failure reasons of the checks that could not complete.
    pub fn failures(&self) -> Vec<(ConflictKind, &str)> {
        [
            (ConflictKind::Classroom, &self.classroom),
            (ConflictKind::Instructor, &self.instructor),
        ]
        .into_iter()
        .filter_map(|(kind, outcome)| outcome.failure_reason().map(|r| (kind, r)))
        .collect()
    }

    /// True if both checks ran to completion.
    pub fn is_complete(&self) -> bool {
        !self.classroom.is_failed() && !self.instructor.is_failed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conflict(kind: ConflictKind, index: usize) -> Conflict {
        Conflict {
            kind,
            schedule_index: index,
            conflict_with: ConflictWith {
                class_name: "수학A".to_string(),
                day_of_week: DayOfWeek::Monday,
                start_time: TimeOfDay::parse("14:30").unwrap(),
                end_time: TimeOfDay::parse("15:30").unwrap(),
            },
            message: "msg".to_string(),
        }
    }

    #[test]
    fn test_conflict_serializes_camel_case() {
        let json = serde_json::to_value(conflict(ConflictKind::Classroom, 0)).unwrap();
        assert_eq!(json["type"], "classroom");
        assert_eq!(json["scheduleIndex"], 0);
        assert_eq!(json["conflictWith"]["className"], "수학A");
        assert_eq!(json["conflictWith"]["dayOfWeek"], 1);
        assert_eq!(json["conflictWith"]["startTime"], "14:30");
    }

    #[test]
    fn test_report_merges_classroom_first() {
        let report = ScheduleConflictReport {
            classroom: CheckOutcome::from_conflicts(vec![conflict(ConflictKind::Classroom, 1)]),
            instructor: CheckOutcome::from_conflicts(vec![conflict(ConflictKind::Instructor, 0)]),
        };
        let kinds: Vec<_> = report.conflicts().iter().map(|c| c.kind).collect();
        assert_eq!(kinds, vec![ConflictKind::Classroom, ConflictKind::Instructor]);
        assert!(report.has_conflict());
        assert!(report.is_complete());
    }

    #[test]
    fn test_failed_check_is_not_a_conflict() {
        let report = ScheduleConflictReport {
            classroom: CheckOutcome::CheckFailed {
                reason: "db down".to_string(),
            },
            instructor: CheckOutcome::from_conflicts(Vec::new()),
        };
        assert!(!report.has_conflict());
        assert!(!report.is_complete());
        assert_eq!(report.failures(), vec![(ConflictKind::Classroom, "db down")]);
        assert_eq!(report.instructor, CheckOutcome::NoConflicts);
    }

    #[test]
    fn test_status_round_trip() {
        for status in [ClassStatus::Active, ClassStatus::Inactive, ClassStatus::Preparing] {
            assert_eq!(ClassStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ClassStatus::parse("archived"), None);
    }
}
