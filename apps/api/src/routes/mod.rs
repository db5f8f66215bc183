pub mod health;
pub mod sessions;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/sessions", post(sessions::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(sessions::handle_get_session).delete(sessions::handle_delete_session),
        )
        .route("/api/v1/sessions/:id/job", put(sessions::handle_set_job))
        .route(
            "/api/v1/sessions/:id/job/fetch",
            post(sessions::handle_fetch_jd),
        )
        .route(
            "/api/v1/sessions/:id/keywords",
            post(sessions::handle_extract_keywords),
        )
        .route(
            "/api/v1/sessions/:id/navigate",
            post(sessions::handle_navigate),
        )
        .route(
            "/api/v1/sessions/:id/profile",
            put(sessions::handle_update_profile),
        )
        .route(
            "/api/v1/sessions/:id/profile/reset",
            post(sessions::handle_reset_profile),
        )
        .route(
            "/api/v1/sessions/:id/resume/upload",
            post(sessions::handle_upload_resume),
        )
        .route(
            "/api/v1/sessions/:id/resume/generate",
            post(sessions::handle_generate_resume),
        )
        .route("/api/v1/sessions/:id/scan", post(sessions::handle_ats_scan))
        .route(
            "/api/v1/sessions/:id/export",
            get(sessions::handle_export_pdf),
        )
        .with_state(state)
}
