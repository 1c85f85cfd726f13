//! Conflict detection for proposed weekly schedules.
//!
//! Each check reads the active classes sharing the resource (a classroom or
//! an instructor) and compares every stored slot with every candidate slot:
//! 1. existing classes in store order (outer loop)
//! 2. each existing class's slots
//! 3. candidate slots in caller order (inner loop)
//!
//! Every colliding pair yields one `Conflict`; nothing is deduplicated.

use super::config::CheckerConfig;
use super::time::TimeSlot;
use super::types::{
    CheckOutcome, ClassId, ClassStatus, Conflict, ConflictKind, ConflictWith, ExistingClass,
    ScheduleConflictReport,
};
use crate::db::ClassStore;
use rand::Rng;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// Checks candidate schedules against the classes held by a `ClassStore`.
#[derive(Clone)]
pub struct ConflictChecker {
    store: Arc<dyn ClassStore>,
    config: CheckerConfig,
}

impl ConflictChecker {
    pub fn new(store: Arc<dyn ClassStore>) -> Self {
        Self::with_config(store, CheckerConfig::default())
    }

    pub fn with_config(store: Arc<dyn ClassStore>, config: CheckerConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    /// Checks whether any candidate slot overlaps an active class using the
    /// same classroom.
    ///
    /// A blank classroom or an empty candidate list is trivially conflict-free
    /// and does not touch the store.
    pub async fn check_classroom_conflict(
        &self,
        classroom: Option<&str>,
        candidates: &[TimeSlot],
        exclude_class_id: Option<ClassId>,
    ) -> CheckOutcome {
        let Some(classroom) = non_blank(classroom) else {
            return CheckOutcome::NoConflicts;
        };
        if candidates.is_empty() {
            return CheckOutcome::NoConflicts;
        }

        let correlation_id = generate_correlation_id(ConflictKind::Classroom);
        let start = Instant::now();
        debug!(
            correlation_id = %correlation_id,
            classroom = %classroom,
            candidates = candidates.len(),
            exclude = ?exclude_class_id,
            "Checking classroom conflicts"
        );

        let existing = match self
            .store
            .find_active_classes_by_room(classroom, exclude_class_id)
            .await
        {
            Ok(existing) => existing,
            Err(e) => {
                error!(
                    correlation_id = %correlation_id,
                    classroom = %classroom,
                    error = %e,
                    "Classroom conflict check failed"
                );
                return CheckOutcome::CheckFailed {
                    reason: e.to_string(),
                };
            }
        };

        let conflicts = collect_conflicts(
            &existing,
            candidates,
            exclude_class_id,
            0,
            ConflictKind::Classroom,
            |class| self.config.messages.classroom_message(&class.name, classroom),
        );

        info!(
            correlation_id = %correlation_id,
            classroom = %classroom,
            existing_classes = existing.len(),
            conflicts = conflicts.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Classroom conflict check finished"
        );

        CheckOutcome::from_conflicts(conflicts)
    }

    /// Checks whether any candidate slot overlaps another active class taught
    /// by the same instructor.
    ///
    /// Both end times are extended by the configured travel buffer before
    /// comparing, so back-to-back slots count as a conflict.
    pub async fn check_instructor_conflict(
        &self,
        instructor_id: Option<&str>,
        candidates: &[TimeSlot],
        exclude_class_id: Option<ClassId>,
    ) -> CheckOutcome {
        let Some(instructor_id) = non_blank(instructor_id) else {
            return CheckOutcome::NoConflicts;
        };
        if candidates.is_empty() {
            return CheckOutcome::NoConflicts;
        }

        let buffer = self.config.instructor_buffer_minutes;
        let correlation_id = generate_correlation_id(ConflictKind::Instructor);
        let start = Instant::now();
        debug!(
            correlation_id = %correlation_id,
            instructor = %instructor_id,
            candidates = candidates.len(),
            buffer_minutes = buffer,
            exclude = ?exclude_class_id,
            "Checking instructor conflicts"
        );

        let existing = match self
            .store
            .find_active_classes_by_instructor(instructor_id, exclude_class_id)
            .await
        {
            Ok(existing) => existing,
            Err(e) => {
                error!(
                    correlation_id = %correlation_id,
                    instructor = %instructor_id,
                    error = %e,
                    "Instructor conflict check failed"
                );
                return CheckOutcome::CheckFailed {
                    reason: e.to_string(),
                };
            }
        };

        let conflicts = collect_conflicts(
            &existing,
            candidates,
            exclude_class_id,
            buffer,
            ConflictKind::Instructor,
            |class| self.config.messages.instructor_message(&class.name, buffer),
        );

        info!(
            correlation_id = %correlation_id,
            instructor = %instructor_id,
            existing_classes = existing.len(),
            conflicts = conflicts.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Instructor conflict check finished"
        );

        CheckOutcome::from_conflicts(conflicts)
    }

    /// Runs the classroom and instructor checks concurrently.
    pub async fn check_schedule_conflicts(
        &self,
        classroom: Option<&str>,
        instructor_id: Option<&str>,
        candidates: &[TimeSlot],
        exclude_class_id: Option<ClassId>,
    ) -> ScheduleConflictReport {
        let (classroom, instructor) = futures::join!(
            self.check_classroom_conflict(classroom, candidates, exclude_class_id),
            self.check_instructor_conflict(instructor_id, candidates, exclude_class_id),
        );

        ScheduleConflictReport {
            classroom,
            instructor,
        }
    }
}

/// Pairs every stored slot with every candidate and builds one conflict per
/// collision.
fn collect_conflicts<F>(
    existing: &[ExistingClass],
    candidates: &[TimeSlot],
    exclude_class_id: Option<ClassId>,
    buffer: u32,
    kind: ConflictKind,
    message: F,
) -> Vec<Conflict>
where
    F: Fn(&ExistingClass) -> String,
{
    let mut conflicts = Vec::new();

    // Stores already filter on status and exclusion; both are re-checked here.
    let in_scope = existing
        .iter()
        .filter(|c| c.status == ClassStatus::Active && Some(c.id) != exclude_class_id);

    for class in in_scope {
        for existing_slot in &class.schedules {
            for (index, candidate) in candidates.iter().enumerate() {
                if candidate.collides_with(existing_slot, buffer) {
                    conflicts.push(Conflict {
                        kind,
                        schedule_index: index,
                        conflict_with: ConflictWith {
                            class_name: class.name.clone(),
                            day_of_week: existing_slot.day_of_week,
                            start_time: existing_slot.start_time,
                            end_time: existing_slot.end_time,
                        },
                        message: message(class),
                    });
                }
            }
        }
    }

    conflicts
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Tags the log lines of one check, e.g. `room-1a2b3c4d5e-00f1a2`.
fn generate_correlation_id(kind: ConflictKind) -> String {
    let prefix = match kind {
        ConflictKind::Classroom => "room",
        ConflictKind::Instructor => "inst",
    };
    let suffix: u32 = rand::thread_rng().gen_range(0..0x100_0000);
    format!(
        "{}-{:x}-{:06x}",
        prefix,
        chrono::Utc::now().timestamp_millis(),
        suffix
    )
}
