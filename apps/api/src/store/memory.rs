use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::{Application, ApplicationFilter, ApplicationStatus};
use crate::models::job::{JobFilter, JobPosting, JobStatus};
use crate::models::notification::Notification;
use crate::models::talent::TalentProfile;
use crate::models::user::{User, UserRole};
use crate::store::RecruitingStore;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    profiles: Vec<TalentProfile>,
    jobs: Vec<JobPosting>,
    applications: Vec<Application>,
    notifications: Vec<Notification>,
}

/// Vec-backed store. Jobs are kept newest first to mirror the SQL ordering.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    /// When set, every call fails with a database-style error.
    failing: bool,
    /// When set, only notification writes fail.
    failing_notifications: bool,
}

impl MemoryStore {
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn failing_notifications() -> Self {
        Self {
            failing_notifications: true,
            ..Self::default()
        }
    }

    pub fn add_user(&self, role: UserRole) -> Uuid {
        let id = Uuid::new_v4();
        self.tables.lock().unwrap().users.push(User {
            id,
            name: format!("user-{id}"),
            email: format!("{id}@example.com"),
            role: role.as_str().to_string(),
            created_at: Utc::now(),
        });
        id
    }

    pub fn add_profile(&self, profile: TalentProfile) {
        self.tables.lock().unwrap().profiles.push(profile);
    }

    pub fn add_job(&self, job: JobPosting) {
        self.tables.lock().unwrap().jobs.insert(0, job);
    }

    pub fn applications(&self) -> Vec<Application> {
        self.tables.lock().unwrap().applications.clone()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.tables.lock().unwrap().notifications.clone()
    }

    fn check(&self) -> Result<(), AppError> {
        if self.failing {
            return Err(AppError::Internal(anyhow::anyhow!("store unavailable")));
        }
        Ok(())
    }
}

/// An active posting with the given skills and no language or location requirement.
pub fn sample_job(posted_by: Uuid, skills: &[&str]) -> JobPosting {
    let now = Utc::now();
    JobPosting {
        id: Uuid::new_v4(),
        posted_by,
        title: "Software Engineer".to_string(),
        description: None,
        location: None,
        skills: skills.iter().map(|s| s.to_string()).collect(),
        german_level: None,
        experience_level: None,
        visa_sponsorship: None,
        remote: false,
        status: JobStatus::Active.as_str().to_string(),
        application_deadline: None,
        created_at: now,
        updated_at: now,
    }
}

fn has_applied(tables: &Tables, job_id: Uuid, user_id: Uuid) -> bool {
    tables
        .applications
        .iter()
        .any(|a| a.job_id == job_id && a.user_id == user_id)
}

fn is_active(job: &JobPosting) -> bool {
    job.status() == Some(JobStatus::Active)
}

#[async_trait]
impl RecruitingStore for MemoryStore {
    async fn fetch_user(&self, user_id: Uuid) -> Result<Option<User>, AppError> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.id == user_id).cloned())
    }

    async fn fetch_talent_profile(
        &self,
        user_id: Uuid,
    ) -> Result<Option<TalentProfile>, AppError> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables.profiles.iter().find(|p| p.user_id == user_id).cloned())
    }

    async fn upsert_talent_profile(
        &self,
        profile: &TalentProfile,
    ) -> Result<TalentProfile, AppError> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        tables.profiles.retain(|p| p.user_id != profile.user_id);
        tables.profiles.push(profile.clone());
        Ok(profile.clone())
    }

    async fn fetch_job(&self, job_id: Uuid) -> Result<Option<JobPosting>, AppError> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables.jobs.iter().find(|j| j.id == job_id).cloned())
    }

    async fn insert_job(&self, job: &JobPosting) -> Result<JobPosting, AppError> {
        self.check()?;
        self.tables.lock().unwrap().jobs.insert(0, job.clone());
        Ok(job.clone())
    }

    async fn list_jobs(&self, filter: &JobFilter) -> Result<Vec<JobPosting>, AppError> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .jobs
            .iter()
            .filter(|j| filter.status.map_or(true, |s| j.status() == Some(s)))
            .filter(|j| filter.posted_by.map_or(true, |p| j.posted_by == p))
            .cloned()
            .collect())
    }

    async fn update_job_status(
        &self,
        job_id: Uuid,
        status: JobStatus,
    ) -> Result<JobPosting, AppError> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        let job = tables
            .jobs
            .iter_mut()
            .find(|j| j.id == job_id)
            .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;
        job.status = status.as_str().to_string();
        job.updated_at = Utc::now();
        Ok(job.clone())
    }

    async fn open_jobs_not_applied_by(&self, user_id: Uuid) -> Result<Vec<JobPosting>, AppError> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .jobs
            .iter()
            .filter(|j| is_active(j) && !has_applied(&tables, j.id, user_id))
            .cloned()
            .collect())
    }

    async fn active_jobs_with_any_skill(
        &self,
        skills: &[String],
    ) -> Result<Vec<JobPosting>, AppError> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .jobs
            .iter()
            .filter(|j| is_active(j) && j.skills.iter().any(|s| skills.contains(s)))
            .cloned()
            .collect())
    }

    async fn recent_active_jobs(&self, limit: i64) -> Result<Vec<JobPosting>, AppError> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .jobs
            .iter()
            .filter(|j| is_active(j))
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn talents_not_applied_to(
        &self,
        job_id: Uuid,
    ) -> Result<Vec<TalentProfile>, AppError> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .profiles
            .iter()
            .filter(|p| !has_applied(&tables, job_id, p.user_id))
            .cloned()
            .collect())
    }

    async fn find_application(
        &self,
        job_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Application>, AppError> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .applications
            .iter()
            .find(|a| a.job_id == job_id && a.user_id == user_id)
            .cloned())
    }

    async fn fetch_application(&self, id: Uuid) -> Result<Option<Application>, AppError> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables.applications.iter().find(|a| a.id == id).cloned())
    }

    async fn insert_application(
        &self,
        application: &Application,
    ) -> Result<Application, AppError> {
        self.check()?;
        self.tables
            .lock()
            .unwrap()
            .applications
            .push(application.clone());
        Ok(application.clone())
    }

    async fn list_applications(
        &self,
        user_id: Uuid,
        status: Option<ApplicationStatus>,
    ) -> Result<Vec<Application>, AppError> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .applications
            .iter()
            .filter(|a| a.user_id == user_id)
            .filter(|a| status.map_or(true, |s| a.status == s.as_str()))
            .cloned()
            .collect())
    }

    async fn list_applications_for_poster(
        &self,
        posted_by: Option<Uuid>,
        filter: &ApplicationFilter,
    ) -> Result<Vec<Application>, AppError> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        let mut applications: Vec<Application> = tables
            .applications
            .iter()
            .filter(|a| {
                tables.jobs.iter().any(|j| {
                    j.id == a.job_id && posted_by.map_or(true, |p| j.posted_by == p)
                })
            })
            .filter(|a| filter.job_id.map_or(true, |id| a.job_id == id))
            .filter(|a| filter.status.map_or(true, |s| a.status == s.as_str()))
            .cloned()
            .collect();
        applications.sort_by(|a, b| b.match_score.cmp(&a.match_score));
        Ok(applications)
    }

    async fn update_application_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<Application, AppError> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        let application = tables
            .applications
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))?;
        application.status = status.as_str().to_string();
        application.updated_at = Utc::now();
        Ok(application.clone())
    }

    async fn insert_notification(&self, notification: &Notification) -> Result<(), AppError> {
        self.check()?;
        if self.failing_notifications {
            return Err(AppError::Internal(anyhow::anyhow!("notifications unavailable")));
        }
        self.tables
            .lock()
            .unwrap()
            .notifications
            .insert(0, notification.clone());
        Ok(())
    }

    async fn list_notifications(
        &self,
        user_id: Uuid,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Notification>, i64), AppError> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        let matching: Vec<_> = tables
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id && (!unread_only || !n.is_read))
            .cloned()
            .collect();
        let total = matching.len() as i64;
        let page = matching
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect();
        Ok((page, total))
    }

    async fn mark_notification_read(&self, user_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        match tables
            .notifications
            .iter_mut()
            .find(|n| n.id == id && n.user_id == user_id)
        {
            Some(n) => {
                n.is_read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn mark_all_notifications_read(&self, user_id: Uuid) -> Result<u64, AppError> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        let mut updated = 0;
        for n in tables
            .notifications
            .iter_mut()
            .filter(|n| n.user_id == user_id && !n.is_read)
        {
            n.is_read = true;
            updated += 1;
        }
        Ok(updated)
    }

    async fn delete_notification(&self, user_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        let before = tables.notifications.len();
        tables
            .notifications
            .retain(|n| !(n.id == id && n.user_id == user_id));
        Ok(tables.notifications.len() < before)
    }
}
