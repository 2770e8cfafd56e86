pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::analysis::handlers;
use crate::models::resume::MAX_RESUME_BYTES;
use crate::state::AppState;

/// Room for multipart boundaries and the job URL field on top of the file.
pub const MULTIPART_OVERHEAD: usize = 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Analysis API
        .route("/api/v1/analyses", post(handlers::handle_analyze))
        .route("/api/v1/match", post(handlers::handle_match))
        // Session API
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::handle_get_session).delete(handlers::handle_delete_session),
        )
        .route(
            "/api/v1/sessions/:id/resume",
            put(handlers::handle_upload_resume).delete(handlers::handle_remove_resume),
        )
        .route(
            "/api/v1/sessions/:id/job-url",
            put(handlers::handle_submit_job_url),
        )
        .layer(DefaultBodyLimit::max(MAX_RESUME_BYTES + MULTIPART_OVERHEAD))
        .with_state(state)
}
