/// Row and input types for stored classes
use crate::schedule::{ClassStatus, TimeSlot};
use serde::{Deserialize, Serialize};

/// A class to be inserted together with its weekly schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClass {
    pub name: String,
    pub classroom: Option<String>,
    pub main_instructor_id: Option<String>,
    pub status: ClassStatus,
    pub schedules: Vec<TimeSlot>,
}

/// Flat row produced by the classes/class_schedules join.
#[derive(Debug, Clone)]
pub(super) struct DbClassRow {
    pub id: i64,
    pub name: String,
    pub classroom: Option<String>,
    pub main_instructor_id: Option<String>,
    pub status: String,
    pub day_of_week: Option<i64>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}
