//! Storage seam for everything the request handlers read or write.
//!
//! `AppState` carries an `Arc<dyn RecruitingStore>`. Production wires in
//! `PgStore`; tests use the in-memory store.

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::{Application, ApplicationFilter, ApplicationStatus};
use crate::models::job::{JobFilter, JobPosting, JobStatus};
use crate::models::notification::Notification;
use crate::models::talent::TalentProfile;
use crate::models::user::User;

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgStore;

#[async_trait]
pub trait RecruitingStore: Send + Sync {
    // Users and profiles
    async fn fetch_user(&self, user_id: Uuid) -> Result<Option<User>, AppError>;
    async fn fetch_talent_profile(&self, user_id: Uuid)
        -> Result<Option<TalentProfile>, AppError>;
    async fn upsert_talent_profile(&self, profile: &TalentProfile)
        -> Result<TalentProfile, AppError>;

    // Jobs
    async fn fetch_job(&self, job_id: Uuid) -> Result<Option<JobPosting>, AppError>;
    async fn insert_job(&self, job: &JobPosting) -> Result<JobPosting, AppError>;
    async fn list_jobs(&self, filter: &JobFilter) -> Result<Vec<JobPosting>, AppError>;
    async fn update_job_status(
        &self,
        job_id: Uuid,
        status: JobStatus,
    ) -> Result<JobPosting, AppError>;

    // Match candidate pools
    /// Active jobs the talent has not applied to, newest first.
    async fn open_jobs_not_applied_by(&self, user_id: Uuid) -> Result<Vec<JobPosting>, AppError>;
    /// Active jobs sharing at least one of the (normalized) skills, newest first.
    async fn active_jobs_with_any_skill(
        &self,
        skills: &[String],
    ) -> Result<Vec<JobPosting>, AppError>;
    async fn recent_active_jobs(&self, limit: i64) -> Result<Vec<JobPosting>, AppError>;
    /// Talent profiles whose owners have not applied to the job.
    async fn talents_not_applied_to(&self, job_id: Uuid)
        -> Result<Vec<TalentProfile>, AppError>;

    // Applications
    async fn find_application(
        &self,
        job_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Application>, AppError>;
    async fn fetch_application(&self, id: Uuid) -> Result<Option<Application>, AppError>;
    async fn insert_application(&self, application: &Application)
        -> Result<Application, AppError>;
    async fn list_applications(
        &self,
        user_id: Uuid,
        status: Option<ApplicationStatus>,
    ) -> Result<Vec<Application>, AppError>;
    /// Applications to jobs posted by `posted_by` (every job when `None`).
    async fn list_applications_for_poster(
        &self,
        posted_by: Option<Uuid>,
        filter: &ApplicationFilter,
    ) -> Result<Vec<Application>, AppError>;
    /// Rows are never deleted; withdrawal is a status like any other.
    async fn update_application_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<Application, AppError>;

    // Notifications
    async fn insert_notification(&self, notification: &Notification) -> Result<(), AppError>;
    /// Returns one page of notifications plus the total matching count.
    async fn list_notifications(
        &self,
        user_id: Uuid,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Notification>, i64), AppError>;
    async fn mark_notification_read(&self, user_id: Uuid, id: Uuid) -> Result<bool, AppError>;
    async fn mark_all_notifications_read(&self, user_id: Uuid) -> Result<u64, AppError>;
    async fn delete_notification(&self, user_id: Uuid, id: Uuid) -> Result<bool, AppError>;
}
