use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;

use crate::server::endpoints::{classes, conflicts, status};
use crate::types::AppState;

mod endpoints;
mod types;

pub use endpoints::classes::{CreateClassRequest, UpdateClassRequest, UpdateSchedulesRequest};
pub use endpoints::conflicts::ConflictCheckRequest;

/// Creates a router that can be used by `axum`.
///
/// # Parameters
/// - `app_state`: The app server state.
///
/// # Returns
/// The router.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let class_router = Router::new()
        .route(
            "/classes",
            get(classes::get_classes).post(classes::post_create_class),
        )
        .route(
            "/classes/:id",
            get(classes::get_class)
                .put(classes::put_class)
                .delete(classes::delete_class),
        )
        .route("/classes/:id/schedules", put(classes::put_class_schedules));

    Router::new()
        .route("/health", get(status::get_health))
        .route("/schedule/conflicts", post(conflicts::post_check_conflicts))
        .merge(class_router)
        .with_state(app_state)
}

pub mod handlers {
    //! Handler functions, exposed so they can be driven without a listener.
    pub use super::endpoints::classes::{
        delete_class, get_class, get_classes, post_create_class, put_class, put_class_schedules,
    };
    pub use super::endpoints::conflicts::post_check_conflicts;
    pub use super::endpoints::status::get_health;
}
