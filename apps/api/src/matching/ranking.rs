use serde::Serialize;

use crate::matching::scorer::{score_job_match, MatchScore, MatchSettings};
use crate::models::job::JobPosting;
use crate::models::talent::TalentProfile;

/// An entity that candidates of type `C` can be ranked against.
///
/// Both directions delegate to `score_job_match` with the talent on the skill
/// side and the job as the denominator.
pub trait MatchAnchor<C> {
    fn score_candidate(&self, candidate: &C, settings: &MatchSettings) -> MatchScore;
}

impl MatchAnchor<JobPosting> for TalentProfile {
    fn score_candidate(&self, job: &JobPosting, settings: &MatchSettings) -> MatchScore {
        score_job_match(self.into(), job.into(), settings)
    }
}

impl MatchAnchor<TalentProfile> for JobPosting {
    fn score_candidate(&self, talent: &TalentProfile, settings: &MatchSettings) -> MatchScore {
        score_job_match(talent.into(), self.into(), settings)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedMatch<C> {
    pub candidate: C,
    pub match_score: MatchScore,
}

/// Scores every candidate, keeps those at or above `min_score`, orders them by
/// descending score and truncates to `limit`.
///
/// Equal scores keep their input order.
pub fn rank_candidates<A, C>(
    anchor: &A,
    candidates: Vec<C>,
    settings: &MatchSettings,
    min_score: u32,
    limit: usize,
) -> Vec<RankedMatch<C>>
where
    A: MatchAnchor<C>,
{
    let mut ranked: Vec<RankedMatch<C>> = candidates
        .into_iter()
        .map(|candidate| {
            let match_score = anchor.score_candidate(&candidate, settings);
            RankedMatch {
                candidate,
                match_score,
            }
        })
        .filter(|m| m.match_score.score >= min_score)
        .collect();

    // Vec::sort_by is stable
    ranked.sort_by(|a, b| b.match_score.score.cmp(&a.match_score.score));
    ranked.truncate(limit);
    ranked
}
