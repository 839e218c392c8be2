use axum::{
    extract::State,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::access::require_role;
use crate::errors::AppError;
use crate::extract::{AppJson, AppQuery};
use crate::matching::scorer::normalized_skill_list;
use crate::models::talent::{LanguageLevel, TalentProfile};
use crate::models::user::UserRole;
use crate::profiles::completeness::{missing_fields, profile_completion};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

/// Full replacement of the editable profile fields. `resume_url` is owned by
/// the resume upload flow and is not accepted here.
#[derive(Debug, Deserialize)]
pub struct ProfileUpdate {
    pub user_id: Uuid,
    pub full_name: Option<String>,
    pub title: Option<String>,
    pub bio: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    pub german_level: Option<String>,
    pub experience_level: Option<String>,
    pub visa_required: Option<bool>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
}

#[derive(Serialize)]
pub struct ProfileResponse {
    pub profile: TalentProfile,
    pub missing_fields: Vec<&'static str>,
}

impl From<TalentProfile> for ProfileResponse {
    fn from(profile: TalentProfile) -> Self {
        let missing_fields = missing_fields(&profile);
        Self {
            profile,
            missing_fields,
        }
    }
}

/// GET /api/v1/talent/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<UserIdQuery>,
) -> Result<Json<ProfileResponse>, AppError> {
    require_role(state.store.as_ref(), params.user_id, &[UserRole::Talent]).await?;

    let profile = state
        .store
        .fetch_talent_profile(params.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Talent profile not found".to_string()))?;

    Ok(Json(profile.into()))
}

/// PUT /api/v1/talent/profile
pub async fn handle_update_profile(
    State(state): State<AppState>,
    AppJson(update): AppJson<ProfileUpdate>,
) -> Result<Json<ProfileResponse>, AppError> {
    require_role(state.store.as_ref(), update.user_id, &[UserRole::Talent]).await?;

    let existing = state
        .store
        .fetch_talent_profile(update.user_id)
        .await?
        .unwrap_or_else(|| TalentProfile::empty(update.user_id));

    let profile = apply_update(existing, update)?;
    let saved = state.store.upsert_talent_profile(&profile).await?;

    Ok(Json(saved.into()))
}

fn apply_update(
    existing: TalentProfile,
    update: ProfileUpdate,
) -> Result<TalentProfile, AppError> {
    let german_level = match update.german_level.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(
            LanguageLevel::parse(raw)
                .ok_or_else(|| AppError::Validation(format!("Unknown language level '{raw}'")))?
                .as_str()
                .to_string(),
        ),
    };

    let mut profile = TalentProfile {
        user_id: existing.user_id,
        full_name: update.full_name,
        title: update.title,
        bio: update.bio,
        city: update.city.map(|s| s.trim().to_string()),
        country: update.country.map(|s| s.trim().to_string()),
        skills: normalized_skill_list(&update.skills),
        german_level,
        experience_level: update.experience_level,
        visa_required: update.visa_required,
        resume_url: existing.resume_url,
        linkedin_url: update.linkedin_url,
        github_url: update.github_url,
        profile_completion_percentage: 0,
        updated_at: Utc::now(),
    };
    profile.profile_completion_percentage = profile_completion(&profile);
    Ok(profile)
}
