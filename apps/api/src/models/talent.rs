use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Ordinal language proficiency. Variant order is the proficiency order.
///
/// Deserializes through [`LanguageLevel::parse`]; unknown names are an error.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum LanguageLevel {
    None,
    Basic,
    Intermediate,
    Fluent,
    Native,
}

impl LanguageLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageLevel::None => "none",
            LanguageLevel::Basic => "basic",
            LanguageLevel::Intermediate => "intermediate",
            LanguageLevel::Fluent => "fluent",
            LanguageLevel::Native => "native",
        }
    }

    /// Case-insensitive. `conversational` is the legacy name for `intermediate`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "none" => Some(LanguageLevel::None),
            "basic" => Some(LanguageLevel::Basic),
            "intermediate" | "conversational" => Some(LanguageLevel::Intermediate),
            "fluent" => Some(LanguageLevel::Fluent),
            "native" => Some(LanguageLevel::Native),
            _ => None,
        }
    }
}

impl TryFrom<String> for LanguageLevel {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        LanguageLevel::parse(&raw).ok_or_else(|| format!("unknown language level '{raw}'"))
    }
}

/// `deserialize_with` helper for scoring inputs: unknown or blank levels
/// become `None` instead of failing the request.
pub fn lenient_language_level<'de, D>(deserializer: D) -> Result<Option<LanguageLevel>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(LanguageLevel::parse))
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TalentProfile {
    pub user_id: Uuid,
    pub full_name: Option<String>,
    pub title: Option<String>,
    pub bio: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub skills: Vec<String>,
    pub german_level: Option<String>,
    pub experience_level: Option<String>,
    pub visa_required: Option<bool>,
    pub resume_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub profile_completion_percentage: i32,
    pub updated_at: DateTime<Utc>,
}

impl TalentProfile {
    /// A blank profile for a talent that has not saved one yet.
    pub fn empty(user_id: Uuid) -> Self {
        Self {
            user_id,
            full_name: None,
            title: None,
            bio: None,
            city: None,
            country: None,
            skills: Vec::new(),
            german_level: None,
            experience_level: None,
            visa_required: None,
            resume_url: None,
            linkedin_url: None,
            github_url: None,
            profile_completion_percentage: 0,
            updated_at: Utc::now(),
        }
    }

    pub fn language_level(&self) -> Option<LanguageLevel> {
        self.german_level.as_deref().and_then(LanguageLevel::parse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_are_ordered() {
        assert!(LanguageLevel::None < LanguageLevel::Basic);
        assert!(LanguageLevel::Basic < LanguageLevel::Intermediate);
        assert!(LanguageLevel::Intermediate < LanguageLevel::Fluent);
        assert!(LanguageLevel::Fluent < LanguageLevel::Native);
    }

    #[test]
    fn test_parse_is_case_insensitive_and_accepts_conversational() {
        assert_eq!(LanguageLevel::parse(" Fluent "), Some(LanguageLevel::Fluent));
        assert_eq!(
            LanguageLevel::parse("conversational"),
            Some(LanguageLevel::Intermediate)
        );
        assert_eq!(LanguageLevel::parse("C1"), None);
    }

    #[test]
    fn test_deserialize_goes_through_parse() {
        let level: LanguageLevel = serde_json::from_str(r#""Conversational""#).unwrap();
        assert_eq!(level, LanguageLevel::Intermediate);
        assert!(serde_json::from_str::<LanguageLevel>(r#""B2""#).is_err());
        assert_eq!(serde_json::to_string(&LanguageLevel::Fluent).unwrap(), r#""fluent""#);
    }

    #[derive(Deserialize)]
    struct Lenient {
        #[serde(default, deserialize_with = "lenient_language_level")]
        level: Option<LanguageLevel>,
    }

    #[test]
    fn test_lenient_level_maps_unknown_to_none() {
        let parsed: Lenient = serde_json::from_str(r#"{"level": "B2"}"#).unwrap();
        assert_eq!(parsed.level, None);
        let parsed: Lenient = serde_json::from_str(r#"{"level": "NATIVE"}"#).unwrap();
        assert_eq!(parsed.level, Some(LanguageLevel::Native));
        let parsed: Lenient = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.level, None);
    }

    #[test]
    fn test_unparseable_profile_level_is_absent() {
        let mut profile = TalentProfile::empty(Uuid::new_v4());
        profile.german_level = Some("sort of".to_string());
        assert_eq!(profile.language_level(), None);
    }
}
