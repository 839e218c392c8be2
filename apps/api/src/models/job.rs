use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::talent::LanguageLevel;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Draft,
    Active,
    Closed,
    Archived,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Draft => "draft",
            JobStatus::Active => "active",
            JobStatus::Closed => "closed",
            JobStatus::Archived => "archived",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "draft" => Some(JobStatus::Draft),
            "active" => Some(JobStatus::Active),
            "closed" => Some(JobStatus::Closed),
            "archived" => Some(JobStatus::Archived),
            _ => None,
        }
    }

    /// Postings are retired by moving to `Archived`, never deleted.
    pub fn can_transition_to(&self, next: JobStatus) -> bool {
        use JobStatus::*;
        matches!(
            (self, next),
            (Draft, Active)
                | (Draft, Archived)
                | (Active, Closed)
                | (Active, Archived)
                | (Closed, Active)
                | (Closed, Archived)
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobPosting {
    pub id: Uuid,
    pub posted_by: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub skills: Vec<String>,
    pub german_level: Option<String>,
    pub experience_level: Option<String>,
    pub visa_sponsorship: Option<bool>,
    pub remote: bool,
    pub status: String,
    pub application_deadline: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobPosting {
    pub fn status(&self) -> Option<JobStatus> {
        JobStatus::parse(&self.status)
    }

    pub fn required_language_level(&self) -> Option<LanguageLevel> {
        self.german_level.as_deref().and_then(LanguageLevel::parse)
    }

    pub fn deadline_passed(&self, now: DateTime<Utc>) -> bool {
        self.application_deadline.is_some_and(|d| d < now)
    }
}

/// Fields accepted when a hiring manager creates a posting.
#[derive(Debug, Clone, Deserialize)]
pub struct NewJob {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub german_level: Option<LanguageLevel>,
    #[serde(default)]
    pub experience_level: Option<String>,
    #[serde(default)]
    pub visa_sponsorship: Option<bool>,
    #[serde(default)]
    pub remote: bool,
    #[serde(default)]
    pub status: Option<JobStatus>,
    #[serde(default)]
    pub application_deadline: Option<DateTime<Utc>>,
}

/// Optional filters for job listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobFilter {
    pub status: Option<JobStatus>,
    pub posted_by: Option<Uuid>,
}
