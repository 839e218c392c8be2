//! Axum route handlers for a talent's own job applications.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::access::require_role;
use crate::errors::AppError;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::matching::scorer::{score_job_match, JobSide, MatchSettings, TalentSide};
use crate::models::application::{Application, ApplicationStatus};
use crate::models::job::{JobPosting, JobStatus};
use crate::models::notification::{Notification, NotificationType};
use crate::models::talent::TalentProfile;
use crate::models::user::UserRole;
use crate::notifications::deliver;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ApplyRequest {
    pub user_id: Uuid,
    pub job_id: Uuid,
    pub cover_letter: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApplicationListQuery {
    pub user_id: Uuid,
    pub status: Option<ApplicationStatus>,
}

#[derive(Debug, Deserialize)]
pub struct WithdrawRequest {
    pub user_id: Uuid,
}

/// POST /api/v1/talent/applications
pub async fn handle_apply(
    State(state): State<AppState>,
    AppJson(request): AppJson<ApplyRequest>,
) -> Result<(StatusCode, Json<Application>), AppError> {
    let store = state.store.as_ref();
    require_role(store, request.user_id, &[UserRole::Talent]).await?;

    let job = store
        .fetch_job(request.job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {} not found", request.job_id)))?;
    ensure_open(&job)?;

    // A withdrawn application still counts: one application per job, ever.
    if store
        .find_application(job.id, request.user_id)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(
            "You have already applied to this job".to_string(),
        ));
    }

    let profile = store.fetch_talent_profile(request.user_id).await?;
    let match_score = application_score(profile.as_ref(), &job, &state.config.matching);

    let now = Utc::now();
    let application = Application {
        id: Uuid::new_v4(),
        job_id: job.id,
        user_id: request.user_id,
        status: ApplicationStatus::Applied.as_str().to_string(),
        cover_letter: request.cover_letter.filter(|c| !c.trim().is_empty()),
        match_score: match_score as i32,
        applied_at: now,
        updated_at: now,
    };
    let saved = store.insert_application(&application).await?;

    let applicant = profile
        .and_then(|p| p.full_name)
        .unwrap_or_else(|| "A candidate".to_string());
    deliver(
        store,
        Notification::new(
            job.posted_by,
            NotificationType::ApplicationUpdate,
            "New application",
            format!("{applicant} applied to {}", job.title),
        )
        .about("application", saved.id),
    )
    .await;

    Ok((StatusCode::CREATED, Json(saved)))
}

/// GET /api/v1/talent/applications
pub async fn handle_list_applications(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ApplicationListQuery>,
) -> Result<Json<Vec<Application>>, AppError> {
    require_role(state.store.as_ref(), params.user_id, &[UserRole::Talent]).await?;
    let applications = state
        .store
        .list_applications(params.user_id, params.status)
        .await?;
    Ok(Json(applications))
}

/// POST /api/v1/talent/applications/:id/withdraw
///
/// The row is kept with status `withdrawn` so the job's poster keeps the
/// history and the talent cannot apply to the same job again.
pub async fn handle_withdraw(
    State(state): State<AppState>,
    AppPath(application_id): AppPath<Uuid>,
    AppJson(request): AppJson<WithdrawRequest>,
) -> Result<Json<Application>, AppError> {
    let store = state.store.as_ref();
    require_role(store, request.user_id, &[UserRole::Talent]).await?;

    let application = store
        .fetch_application(application_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Application {application_id} not found")))?;
    if application.user_id != request.user_id {
        return Err(AppError::Forbidden(
            "You can only withdraw your own applications".to_string(),
        ));
    }
    if application.status() == Some(ApplicationStatus::Withdrawn) {
        return Err(AppError::Validation(
            "Application is already withdrawn".to_string(),
        ));
    }

    let withdrawn = store
        .update_application_status(application.id, ApplicationStatus::Withdrawn)
        .await?;
    info!(
        "User {} withdrew application {}",
        request.user_id, withdrawn.id
    );

    if let Some(job) = store.fetch_job(withdrawn.job_id).await? {
        deliver(
            store,
            Notification::new(
                job.posted_by,
                NotificationType::ApplicationUpdate,
                "Application withdrawn",
                format!("An application to {} was withdrawn", job.title),
            )
            .about("application", withdrawn.id),
        )
        .await;
    }

    Ok(Json(withdrawn))
}

fn ensure_open(job: &JobPosting) -> Result<(), AppError> {
    if job.status() != Some(JobStatus::Active) {
        return Err(AppError::Validation(
            "This job is not accepting applications".to_string(),
        ));
    }
    if job.deadline_passed(Utc::now()) {
        return Err(AppError::Validation(
            "The application deadline has passed".to_string(),
        ));
    }
    Ok(())
}

/// Talents without a saved profile still get a score: 0.
fn application_score(
    profile: Option<&TalentProfile>,
    job: &JobPosting,
    settings: &MatchSettings,
) -> u32 {
    profile.map_or(0, |p| {
        score_job_match(TalentSide::from(p), JobSide::from(job), settings).score
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Duration;

    use super::*;
    use crate::state::test_support::test_state;
    use crate::store::memory::{sample_job, MemoryStore};

    struct Fixture {
        store: Arc<MemoryStore>,
        talent: Uuid,
        poster: Uuid,
        job: JobPosting,
    }

    fn fixture(store: MemoryStore) -> Fixture {
        let store = Arc::new(store);
        let talent = store.add_user(UserRole::Talent);
        let poster = store.add_user(UserRole::HiringManager);
        let job = sample_job(poster, &["rust", "sql"]);
        store.add_job(job.clone());
        Fixture {
            store,
            talent,
            poster,
            job,
        }
    }

    fn apply_body(f: &Fixture) -> AppJson<ApplyRequest> {
        AppJson(ApplyRequest {
            user_id: f.talent,
            job_id: f.job.id,
            cover_letter: Some("Hello".to_string()),
        })
    }

    async fn apply(f: &Fixture) -> Application {
        let (status, Json(application)) =
            handle_apply(State(test_state(f.store.clone())), apply_body(f))
                .await
                .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        application
    }

    async fn withdraw(f: &Fixture, id: Uuid, user_id: Uuid) -> Result<Application, AppError> {
        handle_withdraw(
            State(test_state(f.store.clone())),
            AppPath(id),
            AppJson(WithdrawRequest { user_id }),
        )
        .await
        .map(|Json(application)| application)
    }

    #[tokio::test]
    async fn test_apply_scores_and_notifies_poster() {
        let f = fixture(MemoryStore::default());
        let mut profile = TalentProfile::empty(f.talent);
        profile.skills = vec!["rust".to_string()];
        f.store.add_profile(profile);

        let application = apply(&f).await;
        assert_eq!(application.match_score, 50);
        assert_eq!(application.status(), Some(ApplicationStatus::Applied));

        let notifications = f.store.notifications();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].user_id, f.poster);
        assert_eq!(notifications[0].related_entity_id, Some(application.id));
    }

    #[tokio::test]
    async fn test_apply_without_profile_scores_zero() {
        let f = fixture(MemoryStore::default());
        assert_eq!(apply(&f).await.match_score, 0);
    }

    #[tokio::test]
    async fn test_duplicate_application_conflicts() {
        let f = fixture(MemoryStore::default());
        apply(&f).await;
        let err = handle_apply(State(test_state(f.store.clone())), apply_body(&f))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(f.store.applications().len(), 1);
    }

    #[tokio::test]
    async fn test_closed_job_rejects_applications() {
        let f = fixture(MemoryStore::default());
        let mut closed = sample_job(f.poster, &["rust"]);
        closed.status = JobStatus::Closed.as_str().to_string();
        f.store.add_job(closed.clone());

        let err = handle_apply(
            State(test_state(f.store.clone())),
            AppJson(ApplyRequest {
                user_id: f.talent,
                job_id: closed.id,
                cover_letter: None,
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_expired_deadline_rejects_applications() {
        let mut job = sample_job(Uuid::new_v4(), &["rust"]);
        job.application_deadline = Some(Utc::now() - Duration::days(1));
        assert!(matches!(ensure_open(&job), Err(AppError::Validation(_))));

        job.application_deadline = Some(Utc::now() + Duration::days(1));
        assert!(ensure_open(&job).is_ok());
    }

    #[tokio::test]
    async fn test_missing_job_is_not_found() {
        let f = fixture(MemoryStore::default());
        let err = handle_apply(
            State(test_state(f.store.clone())),
            AppJson(ApplyRequest {
                user_id: f.talent,
                job_id: Uuid::new_v4(),
                cover_letter: None,
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_notification_failure_does_not_fail_apply() {
        let f = fixture(MemoryStore::failing_notifications());
        let result = handle_apply(State(test_state(f.store.clone())), apply_body(&f)).await;
        assert!(result.is_ok());
        assert_eq!(f.store.applications().len(), 1);
        assert!(f.store.notifications().is_empty());
    }

    #[tokio::test]
    async fn test_hiring_manager_cannot_apply() {
        let f = fixture(MemoryStore::default());
        let err = handle_apply(
            State(test_state(f.store.clone())),
            AppJson(ApplyRequest {
                user_id: f.poster,
                job_id: f.job.id,
                cover_letter: None,
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_withdraw_only_by_owner() {
        let f = fixture(MemoryStore::default());
        let application = apply(&f).await;

        let stranger = f.store.add_user(UserRole::Talent);
        let err = withdraw(&f, application.id, stranger).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        assert_eq!(f.store.applications()[0].status, "applied");
    }

    #[tokio::test]
    async fn test_withdraw_keeps_the_row_and_blocks_reapplying() {
        let f = fixture(MemoryStore::default());
        let application = apply(&f).await;

        let withdrawn = withdraw(&f, application.id, f.talent).await.unwrap();
        assert_eq!(withdrawn.status(), Some(ApplicationStatus::Withdrawn));
        assert_eq!(f.store.applications().len(), 1);
        assert_eq!(f.store.notifications().len(), 2);

        let Json(listed) = handle_list_applications(
            State(test_state(f.store.clone())),
            AppQuery(ApplicationListQuery {
                user_id: f.talent,
                status: Some(ApplicationStatus::Withdrawn),
            }),
        )
        .await
        .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, application.id);

        let err = handle_apply(State(test_state(f.store.clone())), apply_body(&f))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_second_withdraw_is_rejected() {
        let f = fixture(MemoryStore::default());
        let application = apply(&f).await;
        withdraw(&f, application.id, f.talent).await.unwrap();

        let err = withdraw(&f, application.id, f.talent).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(f.store.notifications().len(), 2);
    }
}
