use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::db::{NewClass, StoreError};
use crate::schedule::{
    parse_drafts, ClassId, ClassStatus, ScheduleConflictReport, ScheduleDraft, TimeSlot,
};
use crate::server::types::{ApiErrorType, ConflictReportBody, CreatedClassBody};
use crate::types::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateClassRequest {
    pub name: String,
    #[serde(default)]
    pub classroom: Option<String>,
    #[serde(default)]
    pub main_instructor_id: Option<String>,
    #[serde(default)]
    pub status: ClassStatus,
    pub schedules: Vec<ScheduleDraft>,
}

/// Full edit of a class, as submitted by the edit form.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClassRequest {
    pub name: String,
    #[serde(default)]
    pub classroom: Option<String>,
    #[serde(default)]
    pub main_instructor_id: Option<String>,
    pub status: ClassStatus,
    pub schedules: Vec<ScheduleDraft>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSchedulesRequest {
    pub schedules: Vec<ScheduleDraft>,
}

/// GET /classes
pub async fn get_classes(State(s): State<Arc<AppState>>) -> Response {
    info!("GET /classes");

    match s.store.list_classes() {
        Ok(classes) => (StatusCode::OK, Json(classes)).into_response(),
        Err(e) => store_error_response(e, "Failed to fetch classes"),
    }
}

/// GET /classes/:id
pub async fn get_class(Path(id): Path<ClassId>, State(s): State<Arc<AppState>>) -> Response {
    info!("GET /classes/{}", id);

    match s.store.get_class(id) {
        Ok(Some(class)) => (StatusCode::OK, Json(class)).into_response(),
        Ok(None) => store_error_response(StoreError::NotFound { id }, "Class not found"),
        Err(e) => store_error_response(e, "Failed to fetch class"),
    }
}

/// POST /classes
/// Creates a class once its schedule is valid and free of conflicts.
pub async fn post_create_class(
    State(s): State<Arc<AppState>>,
    Json(body): Json<CreateClassRequest>,
) -> Response {
    info!("POST /classes (name={:?})", body.name);

    let new_class = match validate_class(
        &body.name,
        body.classroom,
        body.main_instructor_id,
        body.status,
        &body.schedules,
    ) {
        Ok(class) => class,
        Err(rejection) => return rejection,
    };

    let report = s
        .checker
        .check_schedule_conflicts(
            new_class.classroom.as_deref(),
            new_class.main_instructor_id.as_deref(),
            &new_class.schedules,
            None,
        )
        .await;
    if let Some(rejection) = gate_on_report(&s, &report) {
        return rejection;
    }

    match s.store.create_class(&new_class) {
        Ok(class_id) => {
            info!("Created class {} ({})", class_id, new_class.name);
            (StatusCode::CREATED, Json(CreatedClassBody { class_id })).into_response()
        }
        Err(e) => store_error_response(e, "Failed to create class"),
    }
}

/// PUT /classes/:id
/// Edits every field of a class. The new classroom and instructor are checked
/// against other classes; the class's own current schedule is ignored.
pub async fn put_class(
    Path(id): Path<ClassId>,
    State(s): State<Arc<AppState>>,
    Json(body): Json<UpdateClassRequest>,
) -> Response {
    info!("PUT /classes/{} (name={:?})", id, body.name);

    let edited = match validate_class(
        &body.name,
        body.classroom,
        body.main_instructor_id,
        body.status,
        &body.schedules,
    ) {
        Ok(class) => class,
        Err(rejection) => return rejection,
    };

    match s.store.get_class(id) {
        Ok(Some(_)) => {}
        Ok(None) => return store_error_response(StoreError::NotFound { id }, "Class not found"),
        Err(e) => return store_error_response(e, "Failed to fetch class"),
    }

    let report = s
        .checker
        .check_schedule_conflicts(
            edited.classroom.as_deref(),
            edited.main_instructor_id.as_deref(),
            &edited.schedules,
            Some(id),
        )
        .await;
    if let Some(rejection) = gate_on_report(&s, &report) {
        return rejection;
    }

    if let Err(e) = s.store.update_class(id, &edited) {
        return store_error_response(e, "Failed to update class");
    }
    info!("Updated class {} (status={})", id, edited.status);

    match s.store.get_class(id) {
        Ok(Some(updated)) => (StatusCode::OK, Json(updated)).into_response(),
        Ok(None) => store_error_response(StoreError::NotFound { id }, "Class not found"),
        Err(e) => store_error_response(e, "Failed to fetch class"),
    }
}

/// DELETE /classes/:id
pub async fn delete_class(Path(id): Path<ClassId>, State(s): State<Arc<AppState>>) -> Response {
    info!("DELETE /classes/{}", id);

    match s.store.delete_class(id) {
        Ok(()) => {
            info!("Deleted class {}", id);
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => store_error_response(e, "Failed to delete class"),
    }
}

/// PUT /classes/:id/schedules
/// Replaces a class's schedule; the class never conflicts with its own
/// current schedule.
pub async fn put_class_schedules(
    Path(id): Path<ClassId>,
    State(s): State<Arc<AppState>>,
    Json(body): Json<UpdateSchedulesRequest>,
) -> Response {
    info!("PUT /classes/{}/schedules", id);

    let class = match s.store.get_class(id) {
        Ok(Some(class)) => class,
        Ok(None) => return store_error_response(StoreError::NotFound { id }, "Class not found"),
        Err(e) => return store_error_response(e, "Failed to fetch class"),
    };

    let slots: Vec<TimeSlot> = match parse_drafts(&body.schedules) {
        Ok(slots) => slots,
        Err(e) => return invalid_schedule_response(e),
    };

    let report = s
        .checker
        .check_schedule_conflicts(
            class.classroom.as_deref(),
            class.main_instructor_id.as_deref(),
            &slots,
            Some(id),
        )
        .await;
    if let Some(rejection) = gate_on_report(&s, &report) {
        return rejection;
    }

    match s.store.replace_schedules(id, &slots) {
        Ok(()) => match s.store.get_class(id) {
            Ok(Some(updated)) => (StatusCode::OK, Json(updated)).into_response(),
            Ok(None) => store_error_response(StoreError::NotFound { id }, "Class not found"),
            Err(e) => store_error_response(e, "Failed to fetch class"),
        },
        Err(e) => store_error_response(e, "Failed to update schedules"),
    }
}

/// Decides whether a conflict report blocks the write.
///
/// Conflicts always block. A check that could not run blocks only when the
/// service is configured to do so.
fn gate_on_report(s: &AppState, report: &ScheduleConflictReport) -> Option<Response> {
    if report.has_conflict() {
        warn!(
            "Rejecting schedule with {} conflict(s)",
            report.conflicts().len()
        );
        let body = ConflictReportBody::new(report, &s.config.checker.day_names);
        return Some((StatusCode::CONFLICT, Json(body)).into_response());
    }

    if !report.is_complete() {
        let reasons = report
            .failures()
            .iter()
            .map(|(kind, reason)| format!("{:?}: {}", kind, reason))
            .collect::<Vec<_>>()
            .join("; ");

        if s.config.checker.block_on_check_failure {
            warn!("Conflict check incomplete, rejecting write: {}", reasons);
            return Some(
                ApiErrorType::from((
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Could not verify schedule conflicts",
                    Some(reasons),
                ))
                .into_response(),
            );
        }
        warn!("Conflict check incomplete, continuing anyway: {}", reasons);
    }

    None
}

/// Checks the name and schedule rows of a class form, trimming the optional
/// fields so blank values are stored as `NULL`.
fn validate_class(
    name: &str,
    classroom: Option<String>,
    main_instructor_id: Option<String>,
    status: ClassStatus,
    drafts: &[ScheduleDraft],
) -> Result<NewClass, Response> {
    let name = name.trim();
    if name.is_empty() {
        return Err(
            ApiErrorType::from((StatusCode::BAD_REQUEST, "Class name is required", None))
                .into_response(),
        );
    }

    let schedules = parse_drafts(drafts).map_err(invalid_schedule_response)?;

    Ok(NewClass {
        name: name.to_string(),
        classroom: non_blank(classroom),
        main_instructor_id: non_blank(main_instructor_id),
        status,
        schedules,
    })
}

fn invalid_schedule_response(e: crate::schedule::DraftError) -> Response {
    warn!("Rejected schedule rows: {}", e);
    ApiErrorType::from((StatusCode::BAD_REQUEST, "Invalid schedule", Some(e.to_string())))
        .into_response()
}

fn store_error_response(e: StoreError, message: &str) -> Response {
    let status = match e {
        StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
        _ => {
            error!("{}: {}", message, e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    ApiErrorType::from((status, message, Some(e.to_string()))).into_response()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
