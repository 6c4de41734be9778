pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::page::handlers;
use crate::state::AppState;

/// Resume uploads larger than this are rejected before reaching the handler.
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/page", get(handlers::handle_get_page))
        .route(
            "/api/v1/page/job-description",
            put(handlers::handle_set_job_description),
        )
        .route(
            "/api/v1/page/resume",
            post(handlers::handle_upload_resume).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/api/v1/page/mode", put(handlers::handle_set_mode))
        .route("/api/v1/page/submit", post(handlers::handle_submit))
        .route("/api/v1/page/messages", post(handlers::handle_send_message))
        .with_state(state)
}
