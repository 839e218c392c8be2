pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post},
    Router,
};

use crate::resume::parser::MAX_RESUME_BYTES;
use crate::state::AppState;
use crate::{applications, jobs, matching, notifications, profiles, resume};

/// Room for multipart framing around the largest accepted resume.
const RESUME_BODY_LIMIT: usize = MAX_RESUME_BYTES + 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Matching
        .route(
            "/api/v1/talent/jobs/matches",
            get(matching::handlers::handle_talent_job_matches),
        )
        .route(
            "/api/v1/talent/jobs/recommendations",
            get(matching::handlers::handle_job_recommendations),
        )
        .route(
            "/api/v1/hiring/talent/matches",
            get(matching::handlers::handle_job_talent_matches),
        )
        .route("/api/v1/match/score", post(matching::handlers::handle_score))
        // Jobs
        .route(
            "/api/v1/jobs",
            get(jobs::handlers::handle_list_jobs).post(jobs::handlers::handle_create_job),
        )
        .route("/api/v1/jobs/:id", get(jobs::handlers::handle_get_job))
        .route(
            "/api/v1/jobs/:id/status",
            patch(jobs::handlers::handle_change_status),
        )
        // Talent profile and resume
        .route(
            "/api/v1/talent/profile",
            get(profiles::handlers::handle_get_profile)
                .put(profiles::handlers::handle_update_profile),
        )
        .route(
            "/api/v1/talent/resume",
            post(resume::handlers::handle_upload_resume)
                .layer(DefaultBodyLimit::max(RESUME_BODY_LIMIT)),
        )
        // Applications
        .route(
            "/api/v1/talent/applications",
            get(applications::handlers::handle_list_applications)
                .post(applications::handlers::handle_apply),
        )
        .route(
            "/api/v1/talent/applications/:id/withdraw",
            post(applications::handlers::handle_withdraw),
        )
        .route(
            "/api/v1/hiring/applications",
            get(applications::hiring::handle_list_job_applications),
        )
        .route(
            "/api/v1/hiring/applications/:id/status",
            patch(applications::hiring::handle_change_stage),
        )
        // Notifications
        .route(
            "/api/v1/notifications",
            get(notifications::handlers::handle_list_notifications)
                .patch(notifications::handlers::handle_mark_read),
        )
        .route(
            "/api/v1/notifications/:id",
            delete(notifications::handlers::handle_delete_notification),
        )
        .with_state(state)
}
