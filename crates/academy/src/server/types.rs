use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::schedule::{
    format_conflict_message, ClassId, Conflict, ConflictKind, DayNames, ScheduleConflictReport,
};

/// Error body returned by every endpoint.
#[derive(Debug, Serialize)]
pub struct ApiErrorType {
    #[serde(skip)]
    status: StatusCode,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<String>,
}

impl From<(StatusCode, &str, Option<String>)> for ApiErrorType {
    fn from((status, error, context): (StatusCode, &str, Option<String>)) -> Self {
        Self {
            status,
            error: error.to_string(),
            context,
        }
    }
}

impl IntoResponse for ApiErrorType {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// A check that could not run, as reported to the client.
#[derive(Debug, Serialize)]
pub struct CheckErrorBody {
    #[serde(rename = "type")]
    pub kind: ConflictKind,
    pub reason: String,
}

/// JSON shape of a combined conflict report.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictReportBody {
    pub has_conflict: bool,
    pub conflicts: Vec<Conflict>,
    pub classroom_conflicts: Vec<Conflict>,
    pub instructor_conflicts: Vec<Conflict>,
    /// `"<className> (<day> <start>-<end>)"` for each entry of `conflicts`
    pub formatted: Vec<String>,
    pub errors: Vec<CheckErrorBody>,
}

impl ConflictReportBody {
    pub fn new(report: &ScheduleConflictReport, names: &DayNames) -> Self {
        let conflicts = report.conflicts();
        let formatted = conflicts
            .iter()
            .map(|c| format_conflict_message(c, names))
            .collect();

        Self {
            has_conflict: report.has_conflict(),
            classroom_conflicts: report.classroom_conflicts().to_vec(),
            instructor_conflicts: report.instructor_conflicts().to_vec(),
            conflicts,
            formatted,
            errors: report
                .failures()
                .into_iter()
                .map(|(kind, reason)| CheckErrorBody {
                    kind,
                    reason: reason.to_string(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedClassBody {
    pub class_id: ClassId,
}
