//! Axum route handlers for job postings.

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::access::require_role;
use crate::errors::AppError;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::matching::scorer::normalized_skill_list;
use crate::models::job::{JobFilter, JobPosting, JobStatus, NewJob};
use crate::models::user::{User, UserRole};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub job: NewJob,
}

#[derive(Debug, Deserialize)]
pub struct StatusChangeRequest {
    pub user_id: Uuid,
    pub status: JobStatus,
}

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateJobRequest>,
) -> Result<(StatusCode, Json<JobPosting>), AppError> {
    let poster = require_role(
        state.store.as_ref(),
        request.user_id,
        &[UserRole::HiringManager, UserRole::Admin],
    )
    .await?;

    let job = build_job(poster.id, request.job)?;
    let saved = state.store.insert_job(&job).await?;

    Ok((StatusCode::CREATED, Json(saved)))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    AppPath(job_id): AppPath<Uuid>,
) -> Result<Json<JobPosting>, AppError> {
    let job = state
        .store
        .fetch_job(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;
    Ok(Json(job))
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    AppQuery(filter): AppQuery<JobFilter>,
) -> Result<Json<Vec<JobPosting>>, AppError> {
    Ok(Json(state.store.list_jobs(&filter).await?))
}

/// PATCH /api/v1/jobs/:id/status
///
/// Only the poster or an admin may move a posting through its lifecycle.
pub async fn handle_change_status(
    State(state): State<AppState>,
    AppPath(job_id): AppPath<Uuid>,
    AppJson(request): AppJson<StatusChangeRequest>,
) -> Result<Json<JobPosting>, AppError> {
    let requester = require_role(
        state.store.as_ref(),
        request.user_id,
        &[UserRole::HiringManager, UserRole::Admin],
    )
    .await?;

    let job = state
        .store
        .fetch_job(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;

    ensure_can_manage(&requester, &job)?;

    let current = job
        .status()
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("job {job_id} has unknown status")))?;
    if !current.can_transition_to(request.status) {
        return Err(AppError::Conflict(format!(
            "Cannot move job from {} to {}",
            current.as_str(),
            request.status.as_str()
        )));
    }

    let updated = state.store.update_job_status(job_id, request.status).await?;
    info!(
        "Job {job_id} moved from {} to {}",
        current.as_str(),
        updated.status
    );
    Ok(Json(updated))
}

pub(crate) fn ensure_can_manage(requester: &User, job: &JobPosting) -> Result<(), AppError> {
    if requester.role() == Some(UserRole::Admin) || job.posted_by == requester.id {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Only the poster or an admin can manage this job".to_string(),
        ))
    }
}

/// New postings start as drafts unless explicitly published.
fn build_job(posted_by: Uuid, new_job: NewJob) -> Result<JobPosting, AppError> {
    let title = new_job.title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("title cannot be empty".to_string()));
    }

    let status = new_job.status.unwrap_or(JobStatus::Draft);
    if !matches!(status, JobStatus::Draft | JobStatus::Active) {
        return Err(AppError::Validation(
            "a new job must be draft or active".to_string(),
        ));
    }

    let now = Utc::now();
    Ok(JobPosting {
        id: Uuid::new_v4(),
        posted_by,
        title: title.to_string(),
        description: new_job.description,
        location: new_job.location.map(|l| l.trim().to_string()),
        skills: normalized_skill_list(&new_job.skills),
        german_level: new_job.german_level.map(|l| l.as_str().to_string()),
        experience_level: new_job.experience_level,
        visa_sponsorship: new_job.visa_sponsorship,
        remote: new_job.remote,
        status: status.as_str().to_string(),
        application_deadline: new_job.application_deadline,
        created_at: now,
        updated_at: now,
    })
}
