pub mod health;

use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::timeout::TimeoutLayer;

use crate::project::handlers as project;
use crate::resume::handlers as resume;
use crate::resume::validation::MAX_UPLOAD_BYTES;
use crate::state::AppState;

// Headroom on top of the file ceiling for multipart boundaries and the
// text parts that ride along with an upload.
const BODY_LIMIT_HEADROOM: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.request_timeout_secs);

    Router::new()
        .route("/health", get(health::health_handler))
        // Resume API
        .route(
            "/api/v1/resumes",
            get(resume::handle_list_resumes).post(resume::handle_upsert_resume),
        )
        .route(
            "/api/v1/resumes/:id",
            get(resume::handle_get_resume).delete(resume::handle_delete_resume),
        )
        .route(
            "/api/v1/resumes/user/:owner_id",
            get(resume::handle_get_resume_by_owner),
        )
        .route(
            "/api/v1/resumes/:id/view",
            post(resume::handle_increment_views),
        )
        .route(
            "/api/v1/resumes/:id/download",
            get(resume::handle_download_resume),
        )
        .route(
            "/api/v1/resumes/search/:query",
            get(resume::handle_search_resumes),
        )
        // Project API
        .route(
            "/api/v1/projects",
            get(project::handle_list_projects).post(project::handle_create_project),
        )
        .route(
            "/api/v1/projects/:id",
            get(project::handle_get_project)
                .put(project::handle_update_project)
                .delete(project::handle_delete_project),
        )
        .route(
            "/api/v1/projects/user/:owner_id",
            get(project::handle_list_projects_by_owner),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + BODY_LIMIT_HEADROOM))
        .layer(TimeoutLayer::new(timeout))
        .with_state(state)
}
