//! Axum route handlers for the Matching API.

use axum::{
    extract::State,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::access::require_role;
use crate::errors::AppError;
use crate::extract::{AppJson, AppQuery};
use crate::matching::ranking::{rank_candidates, RankedMatch};
use crate::matching::scorer::{
    score_job_match, JobSide, MatchScore, MatchSettings, TalentSide, MAX_SCORE,
};
use crate::models::job::JobPosting;
use crate::models::talent::{lenient_language_level, LanguageLevel, TalentProfile};
use crate::models::user::UserRole;
use crate::state::AppState;

const MAX_LIMIT: usize = 100;
const FALLBACK_RECOMMENDATIONS: i64 = 10;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TalentMatchQuery {
    pub user_id: Uuid,
    pub limit: Option<usize>,
    pub min_score: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct HiringMatchQuery {
    pub user_id: Uuid,
    pub job_id: Uuid,
    pub limit: Option<usize>,
    pub min_score: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct MatchesResponse<T> {
    pub matches: Vec<RankedMatch<T>>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<RankedMatch<JobPosting>>,
    pub message: String,
}

/// Talent fields a hiring manager may see in match results.
#[derive(Debug, Clone, Serialize)]
pub struct TalentMatchView {
    pub user_id: Uuid,
    pub full_name: Option<String>,
    pub title: Option<String>,
    pub skills: Vec<String>,
    pub experience_level: Option<String>,
    pub location: String,
    pub german_level: Option<String>,
}

impl From<TalentProfile> for TalentMatchView {
    fn from(profile: TalentProfile) -> Self {
        let location = [profile.city.as_deref(), profile.country.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            user_id: profile.user_id,
            full_name: profile.full_name,
            title: profile.title,
            skills: profile.skills,
            experience_level: profile.experience_level,
            location,
            german_level: profile.german_level,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TalentInput {
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "lenient_language_level")]
    pub language_level: Option<LanguageLevel>,
    pub city: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct JobInput {
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "lenient_language_level")]
    pub language_level: Option<LanguageLevel>,
    pub location: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    #[serde(default)]
    pub talent: TalentInput,
    #[serde(default)]
    pub job: JobInput,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/talent/jobs/matches
///
/// Active jobs the talent has not applied to yet, ranked by match score.
pub async fn handle_talent_job_matches(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<TalentMatchQuery>,
) -> Result<Json<MatchesResponse<JobPosting>>, AppError> {
    let settings = &state.config.matching;
    let (min_score, limit) = resolve_bounds(params.min_score, params.limit, settings)?;

    require_role(state.store.as_ref(), params.user_id, &[UserRole::Talent]).await?;

    let profile = state
        .store
        .fetch_talent_profile(params.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Talent profile not found".to_string()))?;

    let jobs = state.store.open_jobs_not_applied_by(params.user_id).await?;
    let pool_size = jobs.len();
    let matches = rank_candidates(&profile, jobs, settings, min_score, limit);

    info!(
        "Ranked {pool_size} jobs for talent {}: {} matches at min score {min_score}",
        params.user_id,
        matches.len()
    );

    Ok(Json(MatchesResponse {
        count: matches.len(),
        matches,
    }))
}

/// GET /api/v1/hiring/talent/matches
///
/// Talents who have not applied to the job, ranked by match score.
/// Only the posting's owner (or an admin) may ask.
pub async fn handle_job_talent_matches(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<HiringMatchQuery>,
) -> Result<Json<MatchesResponse<TalentMatchView>>, AppError> {
    let settings = &state.config.matching;
    let (min_score, limit) = resolve_bounds(params.min_score, params.limit, settings)?;

    let requester = require_role(
        state.store.as_ref(),
        params.user_id,
        &[UserRole::HiringManager, UserRole::Admin],
    )
    .await?;

    let job = state
        .store
        .fetch_job(params.job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {} not found", params.job_id)))?;

    if requester.role() != Some(UserRole::Admin) && job.posted_by != requester.id {
        return Err(AppError::Forbidden(
            "You can only view matches for jobs you posted".to_string(),
        ));
    }

    let talents = state.store.talents_not_applied_to(job.id).await?;
    let matches: Vec<RankedMatch<TalentMatchView>> =
        rank_candidates(&job, talents, settings, min_score, limit)
            .into_iter()
            .map(|m| RankedMatch {
                candidate: m.candidate.into(),
                match_score: m.match_score,
            })
            .collect();

    info!("Found {} talent matches for job {}", matches.len(), job.id);

    Ok(Json(MatchesResponse {
        count: matches.len(),
        matches,
    }))
}

/// GET /api/v1/talent/jobs/recommendations
///
/// Jobs sharing at least one skill with the profile, or the most recent active
/// jobs when there is nothing to match on. Every job is scored; no threshold.
pub async fn handle_job_recommendations(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<RecommendationQuery>,
) -> Result<Json<RecommendationsResponse>, AppError> {
    require_role(state.store.as_ref(), params.user_id, &[UserRole::Talent]).await?;

    let profile = state
        .store
        .fetch_talent_profile(params.user_id)
        .await?
        .unwrap_or_else(|| TalentProfile::empty(params.user_id));

    let jobs = if profile.skills.is_empty() {
        state.store.recent_active_jobs(FALLBACK_RECOMMENDATIONS).await?
    } else {
        state.store.active_jobs_with_any_skill(&profile.skills).await?
    };

    let total = jobs.len();
    let recommendations = rank_candidates(&profile, jobs, &state.config.matching, 0, total);

    Ok(Json(RecommendationsResponse {
        recommendations,
        message: "Job recommendations retrieved successfully".to_string(),
    }))
}

/// POST /api/v1/match/score
///
/// Scores a single talent/job pair supplied in the body. Touches no storage.
pub async fn handle_score(
    State(state): State<AppState>,
    AppJson(request): AppJson<ScoreRequest>,
) -> Json<MatchScore> {
    let ScoreRequest { talent, job } = request;
    let report = score_job_match(
        TalentSide {
            skills: &talent.skills,
            language_level: talent.language_level,
            city: talent.city.as_deref(),
            country: talent.country.as_deref(),
        },
        JobSide {
            skills: &job.skills,
            language_level: job.language_level,
            location: job.location.as_deref(),
        },
        &state.config.matching,
    );
    Json(report)
}

/// Applies configured defaults and checks `min_score` ∈ [0, 100], `limit` ∈ [1, 100].
fn resolve_bounds(
    min_score: Option<u32>,
    limit: Option<usize>,
    settings: &MatchSettings,
) -> Result<(u32, usize), AppError> {
    let min_score = min_score.unwrap_or(settings.min_score);
    let limit = limit.unwrap_or(settings.limit);

    if min_score > MAX_SCORE {
        return Err(AppError::Validation(format!(
            "min_score must be between 0 and {MAX_SCORE}"
        )));
    }
    if !(1..=MAX_LIMIT).contains(&limit) {
        return Err(AppError::Validation(format!(
            "limit must be between 1 and {MAX_LIMIT}"
        )));
    }
    Ok((min_score, limit))
}
