use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::{Application, ApplicationFilter, ApplicationStatus};
use crate::models::job::{JobFilter, JobPosting, JobStatus};
use crate::models::notification::Notification;
use crate::models::talent::TalentProfile;
use crate::models::user::User;
use crate::store::RecruitingStore;

/// The Postgres backing for `RecruitingStore`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecruitingStore for PgStore {
    async fn fetch_user(&self, user_id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn fetch_talent_profile(
        &self,
        user_id: Uuid,
    ) -> Result<Option<TalentProfile>, AppError> {
        let profile =
            sqlx::query_as::<_, TalentProfile>("SELECT * FROM talent_profiles WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(profile)
    }

    async fn upsert_talent_profile(
        &self,
        profile: &TalentProfile,
    ) -> Result<TalentProfile, AppError> {
        let saved = sqlx::query_as::<_, TalentProfile>(
            r#"
            INSERT INTO talent_profiles
                (user_id, full_name, title, bio, city, country, skills, german_level,
                 experience_level, visa_required, resume_url, linkedin_url, github_url,
                 profile_completion_percentage, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, now())
            ON CONFLICT (user_id) DO UPDATE SET
                full_name = EXCLUDED.full_name,
                title = EXCLUDED.title,
                bio = EXCLUDED.bio,
                city = EXCLUDED.city,
                country = EXCLUDED.country,
                skills = EXCLUDED.skills,
                german_level = EXCLUDED.german_level,
                experience_level = EXCLUDED.experience_level,
                visa_required = EXCLUDED.visa_required,
                resume_url = EXCLUDED.resume_url,
                linkedin_url = EXCLUDED.linkedin_url,
                github_url = EXCLUDED.github_url,
                profile_completion_percentage = EXCLUDED.profile_completion_percentage,
                updated_at = now()
            RETURNING *
            "#,
        )
        .bind(profile.user_id)
        .bind(&profile.full_name)
        .bind(&profile.title)
        .bind(&profile.bio)
        .bind(&profile.city)
        .bind(&profile.country)
        .bind(&profile.skills)
        .bind(&profile.german_level)
        .bind(&profile.experience_level)
        .bind(profile.visa_required)
        .bind(&profile.resume_url)
        .bind(&profile.linkedin_url)
        .bind(&profile.github_url)
        .bind(profile.profile_completion_percentage)
        .fetch_one(&self.pool)
        .await?;

        info!("Saved talent profile for user {}", saved.user_id);
        Ok(saved)
    }

    async fn fetch_job(&self, job_id: Uuid) -> Result<Option<JobPosting>, AppError> {
        let job = sqlx::query_as::<_, JobPosting>("SELECT * FROM jobs WHERE id = $1")
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(job)
    }

    async fn insert_job(&self, job: &JobPosting) -> Result<JobPosting, AppError> {
        let saved = sqlx::query_as::<_, JobPosting>(
            r#"
            INSERT INTO jobs
                (id, posted_by, title, description, location, skills, german_level,
                 experience_level, visa_sponsorship, remote, status, application_deadline,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
            "#,
        )
        .bind(job.id)
        .bind(job.posted_by)
        .bind(&job.title)
        .bind(&job.description)
        .bind(&job.location)
        .bind(&job.skills)
        .bind(&job.german_level)
        .bind(&job.experience_level)
        .bind(job.visa_sponsorship)
        .bind(job.remote)
        .bind(&job.status)
        .bind(job.application_deadline)
        .bind(job.created_at)
        .bind(job.updated_at)
        .fetch_one(&self.pool)
        .await?;

        info!("Inserted job {} posted by {}", saved.id, saved.posted_by);
        Ok(saved)
    }

    async fn list_jobs(&self, filter: &JobFilter) -> Result<Vec<JobPosting>, AppError> {
        let jobs = sqlx::query_as::<_, JobPosting>(
            r#"
            SELECT * FROM jobs
            WHERE ($1::TEXT IS NULL OR status = $1)
              AND ($2::UUID IS NULL OR posted_by = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.posted_by)
        .fetch_all(&self.pool)
        .await?;
        Ok(jobs)
    }

    async fn update_job_status(
        &self,
        job_id: Uuid,
        status: JobStatus,
    ) -> Result<JobPosting, AppError> {
        sqlx::query_as::<_, JobPosting>(
            "UPDATE jobs SET status = $1, updated_at = now() WHERE id = $2 RETURNING *",
        )
        .bind(status.as_str())
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))
    }

    async fn open_jobs_not_applied_by(&self, user_id: Uuid) -> Result<Vec<JobPosting>, AppError> {
        let jobs = sqlx::query_as::<_, JobPosting>(
            r#"
            SELECT j.* FROM jobs j
            WHERE j.status = 'active'
              AND NOT EXISTS (
                  SELECT 1 FROM job_applications a
                  WHERE a.job_id = j.id AND a.user_id = $1
              )
            ORDER BY j.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(jobs)
    }

    async fn active_jobs_with_any_skill(
        &self,
        skills: &[String],
    ) -> Result<Vec<JobPosting>, AppError> {
        let jobs = sqlx::query_as::<_, JobPosting>(
            "SELECT * FROM jobs WHERE status = 'active' AND skills && $1 ORDER BY created_at DESC",
        )
        .bind(skills)
        .fetch_all(&self.pool)
        .await?;
        Ok(jobs)
    }

    async fn recent_active_jobs(&self, limit: i64) -> Result<Vec<JobPosting>, AppError> {
        let jobs = sqlx::query_as::<_, JobPosting>(
            "SELECT * FROM jobs WHERE status = 'active' ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(jobs)
    }

    async fn talents_not_applied_to(
        &self,
        job_id: Uuid,
    ) -> Result<Vec<TalentProfile>, AppError> {
        let talents = sqlx::query_as::<_, TalentProfile>(
            r#"
            SELECT p.* FROM talent_profiles p
            WHERE NOT EXISTS (
                SELECT 1 FROM job_applications a
                WHERE a.user_id = p.user_id AND a.job_id = $1
            )
            ORDER BY p.updated_at DESC
            "#,
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(talents)
    }

    async fn find_application(
        &self,
        job_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Application>, AppError> {
        let application = sqlx::query_as::<_, Application>(
            "SELECT * FROM job_applications WHERE job_id = $1 AND user_id = $2",
        )
        .bind(job_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(application)
    }

    async fn fetch_application(&self, id: Uuid) -> Result<Option<Application>, AppError> {
        let application =
            sqlx::query_as::<_, Application>("SELECT * FROM job_applications WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(application)
    }

    async fn insert_application(
        &self,
        application: &Application,
    ) -> Result<Application, AppError> {
        let saved = sqlx::query_as::<_, Application>(
            r#"
            INSERT INTO job_applications
                (id, job_id, user_id, status, cover_letter, match_score, applied_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(application.id)
        .bind(application.job_id)
        .bind(application.user_id)
        .bind(&application.status)
        .bind(&application.cover_letter)
        .bind(application.match_score)
        .bind(application.applied_at)
        .bind(application.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict("You have already applied to this job".to_string())
            }
            other => AppError::Database(other),
        })?;

        info!(
            "User {} applied to job {} (match score {})",
            saved.user_id, saved.job_id, saved.match_score
        );
        Ok(saved)
    }

    async fn list_applications(
        &self,
        user_id: Uuid,
        status: Option<ApplicationStatus>,
    ) -> Result<Vec<Application>, AppError> {
        let applications = sqlx::query_as::<_, Application>(
            r#"
            SELECT * FROM job_applications
            WHERE user_id = $1 AND ($2::TEXT IS NULL OR status = $2)
            ORDER BY applied_at DESC
            "#,
        )
        .bind(user_id)
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await?;
        Ok(applications)
    }

    async fn list_applications_for_poster(
        &self,
        posted_by: Option<Uuid>,
        filter: &ApplicationFilter,
    ) -> Result<Vec<Application>, AppError> {
        let applications = sqlx::query_as::<_, Application>(
            r#"
            SELECT a.* FROM job_applications a
            JOIN jobs j ON j.id = a.job_id
            WHERE ($1::UUID IS NULL OR j.posted_by = $1)
              AND ($2::UUID IS NULL OR a.job_id = $2)
              AND ($3::TEXT IS NULL OR a.status = $3)
            ORDER BY a.match_score DESC, a.applied_at DESC
            "#,
        )
        .bind(posted_by)
        .bind(filter.job_id)
        .bind(filter.status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await?;
        Ok(applications)
    }

    async fn update_application_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<Application, AppError> {
        let updated = sqlx::query_as::<_, Application>(
            "UPDATE job_applications SET status = $1, updated_at = now() WHERE id = $2 RETURNING *",
        )
        .bind(status.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))?;

        info!("Application {id} moved to {}", updated.status);
        Ok(updated)
    }

    async fn insert_notification(&self, notification: &Notification) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO notifications
                (id, user_id, title, message, notification_type,
                 related_entity_type, related_entity_id, is_read, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(notification.id)
        .bind(notification.user_id)
        .bind(&notification.title)
        .bind(&notification.message)
        .bind(&notification.notification_type)
        .bind(&notification.related_entity_type)
        .bind(notification.related_entity_id)
        .bind(notification.is_read)
        .bind(notification.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_notifications(
        &self,
        user_id: Uuid,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Notification>, i64), AppError> {
        let notifications = sqlx::query_as::<_, Notification>(
            r#"
            SELECT * FROM notifications
            WHERE user_id = $1 AND (NOT $2 OR is_read = false)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(user_id)
        .bind(unread_only)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND (NOT $2 OR is_read = false)",
        )
        .bind(user_id)
        .bind(unread_only)
        .fetch_one(&self.pool)
        .await?;

        Ok((notifications, total))
    }

    async fn mark_notification_read(&self, user_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result =
            sqlx::query("UPDATE notifications SET is_read = true WHERE id = $1 AND user_id = $2")
                .bind(id)
                .bind(user_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn mark_all_notifications_read(&self, user_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = true WHERE user_id = $1 AND is_read = false",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn delete_notification(&self, user_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
