//! Match Scorer: a pure, synchronous compatibility score between a talent
//! profile and a job posting.
//!
//! Algorithm:
//! 1. skill_score = round(100 × |talent ∩ job| / |job|), 0 when the job lists no skills.
//!    Skills are compared case-insensitively after trimming.
//! 2. + `language_bonus` when both sides state a language level and they are equal.
//! 3. + `location_bonus` when the job location equals the talent's city or country
//!    (case-sensitive, empty strings never match).
//! 4. score = min(100, skill_score + bonuses)
//!
//! The talent is always the side whose skills are intersected and the job is
//! always the denominator, regardless of which one anchors a ranking.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::job::JobPosting;
use crate::models::talent::{LanguageLevel, TalentProfile};

pub const MAX_SCORE: u32 = 100;

/// Business-tunable matching constants. Loaded from the environment at startup.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchSettings {
    pub language_bonus: u32,
    pub location_bonus: u32,
    pub min_score: u32,
    pub limit: usize,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            language_bonus: 10,
            location_bonus: 10,
            min_score: 50,
            limit: 10,
        }
    }
}

/// Score breakdown returned alongside each ranked candidate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchScore {
    pub score: u32, // 0 – 100
    pub skill_score: u32,
    pub matched_skills: Vec<String>,
    pub total_skills_required: usize,
    pub language_match: bool,
    pub location_match: bool,
}

/// Borrowed view of the talent fields the scorer reads.
#[derive(Debug, Clone, Copy, Default)]
pub struct TalentSide<'a> {
    pub skills: &'a [String],
    pub language_level: Option<LanguageLevel>,
    pub city: Option<&'a str>,
    pub country: Option<&'a str>,
}

/// Borrowed view of the job fields the scorer reads.
#[derive(Debug, Clone, Copy, Default)]
pub struct JobSide<'a> {
    pub skills: &'a [String],
    pub language_level: Option<LanguageLevel>,
    pub location: Option<&'a str>,
}

impl<'a> From<&'a TalentProfile> for TalentSide<'a> {
    fn from(profile: &'a TalentProfile) -> Self {
        Self {
            skills: &profile.skills,
            language_level: profile.language_level(),
            city: profile.city.as_deref(),
            country: profile.country.as_deref(),
        }
    }
}

impl<'a> From<&'a JobPosting> for JobSide<'a> {
    fn from(job: &'a JobPosting) -> Self {
        Self {
            skills: &job.skills,
            language_level: job.required_language_level(),
            location: job.location.as_deref(),
        }
    }
}

/// Trims, lowercases and dedupes a skill list. Blank entries are dropped.
pub fn normalize_skills(skills: &[String]) -> BTreeSet<String> {
    skills
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Normalized skills as a sorted list, the form persisted on profiles and jobs.
pub fn normalized_skill_list(skills: &[String]) -> Vec<String> {
    normalize_skills(skills).into_iter().collect()
}

pub fn score_job_match(
    talent: TalentSide<'_>,
    job: JobSide<'_>,
    settings: &MatchSettings,
) -> MatchScore {
    let talent_skills = normalize_skills(talent.skills);
    let job_skills = normalize_skills(job.skills);

    let matched_skills: Vec<String> = job_skills.intersection(&talent_skills).cloned().collect();
    let skill_score = skill_overlap_score(matched_skills.len(), job_skills.len());

    let language_match = match (talent.language_level, job.language_level) {
        (Some(have), Some(need)) => have == need,
        _ => false,
    };

    let location_match = match job.location {
        Some(location) if !location.is_empty() => {
            talent.city == Some(location) || talent.country == Some(location)
        }
        _ => false,
    };

    let mut score = skill_score;
    if language_match {
        score = score.saturating_add(settings.language_bonus);
    }
    if location_match {
        score = score.saturating_add(settings.location_bonus);
    }

    MatchScore {
        score: score.min(MAX_SCORE),
        skill_score,
        matched_skills,
        total_skills_required: job_skills.len(),
        language_match,
        location_match,
    }
}

fn skill_overlap_score(matched: usize, required: usize) -> u32 {
    if required == 0 {
        return 0;
    }
    ((matched as f64 / required as f64) * 100.0).round() as u32
}
