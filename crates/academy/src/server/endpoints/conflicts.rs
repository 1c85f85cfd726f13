use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::schedule::{complete_slots, ClassId, ScheduleDraft};
use crate::server::types::{ApiErrorType, ConflictReportBody};
use crate::types::AppState;

/// Body of a live conflict check while a class form is being edited.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictCheckRequest {
    #[serde(default)]
    pub classroom: Option<String>,
    #[serde(default)]
    pub instructor_id: Option<String>,
    #[serde(default)]
    pub schedules: Vec<ScheduleDraft>,
    /// Set when editing an existing class
    #[serde(default)]
    pub exclude_class_id: Option<ClassId>,
}

/// POST /schedule/conflicts
/// Checks the complete rows of a schedule form against existing active classes.
/// `scheduleIndex` in the response refers to the complete rows only.
pub async fn post_check_conflicts(
    State(s): State<Arc<AppState>>,
    Json(body): Json<ConflictCheckRequest>,
) -> Response {
    info!(
        "POST /schedule/conflicts (classroom={:?}, instructor={:?}, rows={})",
        body.classroom,
        body.instructor_id,
        body.schedules.len()
    );

    let slots = match complete_slots(&body.schedules) {
        Ok(slots) => slots,
        Err(e) => {
            warn!("Rejected schedule rows: {}", e);
            return ApiErrorType::from((
                StatusCode::BAD_REQUEST,
                "Invalid schedule",
                Some(e.to_string()),
            ))
            .into_response();
        }
    };

    let report = s
        .checker
        .check_schedule_conflicts(
            body.classroom.as_deref(),
            body.instructor_id.as_deref(),
            &slots,
            body.exclude_class_id,
        )
        .await;

    let response = ConflictReportBody::new(&report, &s.config.checker.day_names);
    (StatusCode::OK, Json(response)).into_response()
}
