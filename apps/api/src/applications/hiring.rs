//! Hiring-manager side of the application pipeline.

use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::access::require_role;
use crate::errors::AppError;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::jobs::handlers::ensure_can_manage;
use crate::models::application::{Application, ApplicationFilter, ApplicationStatus};
use crate::models::notification::{Notification, NotificationType};
use crate::models::user::UserRole;
use crate::notifications::deliver;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct HiringApplicationQuery {
    pub user_id: Uuid,
    pub job_id: Option<Uuid>,
    pub status: Option<ApplicationStatus>,
}

#[derive(Debug, Deserialize)]
pub struct StageChangeRequest {
    pub user_id: Uuid,
    pub status: ApplicationStatus,
}

/// GET /api/v1/hiring/applications
///
/// Applications to the requester's own postings, best match first. Admins
/// see applications to every posting.
pub async fn handle_list_job_applications(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<HiringApplicationQuery>,
) -> Result<Json<Vec<Application>>, AppError> {
    let store = state.store.as_ref();
    let requester = require_role(
        store,
        params.user_id,
        &[UserRole::HiringManager, UserRole::Admin],
    )
    .await?;

    if let Some(job_id) = params.job_id {
        let job = store
            .fetch_job(job_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;
        ensure_can_manage(&requester, &job)?;
    }

    let posted_by = match requester.role() {
        Some(UserRole::Admin) => None,
        _ => Some(requester.id),
    };
    let filter = ApplicationFilter {
        job_id: params.job_id,
        status: params.status,
    };
    Ok(Json(
        store.list_applications_for_poster(posted_by, &filter).await?,
    ))
}

/// PATCH /api/v1/hiring/applications/:id/status
///
/// Moves an application to screening, interview, offer or rejected and tells
/// the talent. Withdrawn applications are frozen.
pub async fn handle_change_stage(
    State(state): State<AppState>,
    AppPath(application_id): AppPath<Uuid>,
    AppJson(request): AppJson<StageChangeRequest>,
) -> Result<Json<Application>, AppError> {
    let store = state.store.as_ref();
    let requester = require_role(
        store,
        request.user_id,
        &[UserRole::HiringManager, UserRole::Admin],
    )
    .await?;

    let application = store
        .fetch_application(application_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Application {application_id} not found")))?;
    let job = store
        .fetch_job(application.job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {} not found", application.job_id)))?;
    ensure_can_manage(&requester, &job)?;

    check_stage_change(application.status(), request.status)?;

    let updated = store
        .update_application_status(application.id, request.status)
        .await?;
    info!(
        "Application {} moved from {} to {} by {}",
        updated.id, application.status, updated.status, requester.id
    );

    deliver(
        store,
        Notification::new(
            updated.user_id,
            NotificationType::ApplicationUpdate,
            "Application update",
            format!(
                "Your application to {} is now: {}",
                job.title,
                request.status.as_str()
            ),
        )
        .about("application", updated.id),
    )
    .await;

    Ok(Json(updated))
}

fn check_stage_change(
    current: Option<ApplicationStatus>,
    next: ApplicationStatus,
) -> Result<(), AppError> {
    if !next.is_hiring_stage() {
        return Err(AppError::Validation(format!(
            "Hiring managers cannot set status '{}'",
            next.as_str()
        )));
    }
    match current {
        Some(ApplicationStatus::Withdrawn) => Err(AppError::Validation(
            "The talent has withdrawn this application".to_string(),
        )),
        Some(status) if status == next => Err(AppError::Validation(format!(
            "Application is already '{}'",
            next.as_str()
        ))),
        _ => Ok(()),
    }
}
