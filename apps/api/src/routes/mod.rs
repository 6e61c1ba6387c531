pub mod health;
pub mod jobs;
pub mod resume;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

use crate::state::AppState;

/// Room for multipart boundaries and headers on top of the resume itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_resume_bytes + MULTIPART_OVERHEAD;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/jobs", get(jobs::handle_list_jobs))
        // Resume API
        .route("/api/v1/resume", delete(resume::handle_delete_resume))
        .route("/api/v1/resume/upload", post(resume::handle_upload))
        .route("/api/v1/resume/analyze-text", post(resume::handle_analyze_text))
        .route("/api/v1/resume/matched-jobs", get(resume::handle_matched_jobs))
        .route("/api/v1/resume/status", get(resume::handle_resume_status))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Reads the leading integer of a query value, like `parseInt`.
/// Anything without one (`abc`, empty) is `None` so the caller's default applies.
pub(crate) fn int_param(raw: Option<&str>) -> Option<i64> {
    let raw = raw?.trim_start();
    let digits_start = usize::from(raw.starts_with(['-', '+']));
    let end = raw[digits_start..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(raw.len(), |i| i + digits_start);
    raw[..end].parse().ok()
}
