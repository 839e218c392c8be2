use crate::models::talent::TalentProfile;

/// Weight of each profile field in the completion percentage. Sums to 100.
const FIELD_WEIGHTS: &[(&str, i32)] = &[
    ("full_name", 15),
    ("title", 10),
    ("bio", 10),
    ("city", 5),
    ("country", 5),
    ("skills", 20),
    ("german_level", 10),
    ("experience_level", 10),
    ("resume_url", 10),
    ("linkedin_url", 5),
];

fn is_filled(profile: &TalentProfile, field: &str) -> bool {
    let text = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
    match field {
        "full_name" => text(&profile.full_name),
        "title" => text(&profile.title),
        "bio" => text(&profile.bio),
        "city" => text(&profile.city),
        "country" => text(&profile.country),
        "skills" => !profile.skills.is_empty(),
        "german_level" => profile.language_level().is_some(),
        "experience_level" => text(&profile.experience_level),
        "resume_url" => text(&profile.resume_url),
        "linkedin_url" => text(&profile.linkedin_url),
        _ => false,
    }
}

/// Percentage (0 – 100) of weighted profile fields that are filled in.
pub fn profile_completion(profile: &TalentProfile) -> i32 {
    FIELD_WEIGHTS
        .iter()
        .filter(|(field, _)| is_filled(profile, field))
        .map(|(_, weight)| weight)
        .sum()
}

/// Fields a talent should fill next, heaviest first.
pub fn missing_fields(profile: &TalentProfile) -> Vec<&'static str> {
    let mut missing: Vec<_> = FIELD_WEIGHTS
        .iter()
        .filter(|(field, _)| !is_filled(profile, field))
        .collect();
    missing.sort_by(|a, b| b.1.cmp(&a.1));
    missing.into_iter().map(|(field, _)| *field).collect()
}
