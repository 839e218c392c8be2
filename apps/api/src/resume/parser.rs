//! Resume text extraction and merging of parsed fields into a profile.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::matching::scorer::normalized_skill_list;
use crate::models::talent::{LanguageLevel, TalentProfile};

pub const MAX_RESUME_BYTES: usize = 5 * 1024 * 1024;
/// Longer resumes are cut before prompting.
const MAX_PROMPT_CHARS: usize = 20_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeFormat {
    Pdf,
    PlainText,
}

impl ResumeFormat {
    /// Content type wins; the file extension is the fallback.
    pub fn detect(content_type: Option<&str>, file_name: Option<&str>) -> Option<Self> {
        match content_type.map(|c| c.split(';').next().unwrap_or(c).trim()) {
            Some("application/pdf") => return Some(ResumeFormat::Pdf),
            Some("text/plain") => return Some(ResumeFormat::PlainText),
            _ => {}
        }
        let extension = file_name?.rsplit_once('.')?.1.to_lowercase();
        match extension.as_str() {
            "pdf" => Some(ResumeFormat::Pdf),
            "txt" => Some(ResumeFormat::PlainText),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ResumeFormat::Pdf => "pdf",
            ResumeFormat::PlainText => "txt",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ResumeFormat::Pdf => "application/pdf",
            ResumeFormat::PlainText => "text/plain",
        }
    }
}

/// Fields the model extracts from a resume. Everything is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsedResume {
    pub full_name: Option<String>,
    pub title: Option<String>,
    pub skills: Vec<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub german_level: Option<String>,
    pub experience_level: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
}

/// PDF extraction runs on the blocking pool; a panic inside the PDF
/// parser is reported the same way as a parse failure.
pub async fn extract_text(format: ResumeFormat, data: Bytes) -> Result<String, AppError> {
    let text = match format {
        ResumeFormat::PlainText => String::from_utf8(data.to_vec())
            .map_err(|_| AppError::UnprocessableEntity("Resume is not valid UTF-8 text".into()))?,
        ResumeFormat::Pdf => tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem(&data)
        })
        .await
        .map_err(|e| AppError::UnprocessableEntity(format!("Could not read PDF: {e}")))?
        .map_err(|e| AppError::UnprocessableEntity(format!("Could not read PDF: {e}")))?,
    };

    if text.trim().is_empty() {
        return Err(AppError::UnprocessableEntity(
            "No text could be extracted from the resume".to_string(),
        ));
    }
    Ok(text)
}

pub fn truncate_for_prompt(text: &str) -> &str {
    match text.char_indices().nth(MAX_PROMPT_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Fills only the fields the talent has left empty and unions skills.
/// Unknown language levels from the model are dropped.
pub fn merge_parsed_resume(mut profile: TalentProfile, parsed: ParsedResume) -> TalentProfile {
    fill(&mut profile.full_name, parsed.full_name);
    fill(&mut profile.title, parsed.title);
    fill(&mut profile.city, parsed.city);
    fill(&mut profile.country, parsed.country);
    fill(&mut profile.experience_level, parsed.experience_level);
    fill(&mut profile.linkedin_url, parsed.linkedin_url);
    fill(&mut profile.github_url, parsed.github_url);

    if profile.language_level().is_none() {
        profile.german_level = parsed
            .german_level
            .as_deref()
            .and_then(LanguageLevel::parse)
            .map(|l| l.as_str().to_string());
    }

    let mut skills = std::mem::take(&mut profile.skills);
    skills.extend(parsed.skills);
    profile.skills = normalized_skill_list(&skills);

    profile
}

fn fill(slot: &mut Option<String>, value: Option<String>) {
    let is_empty = slot.as_deref().map_or(true, |s| s.trim().is_empty());
    if is_empty {
        if let Some(v) = value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
            *slot = Some(v);
        }
    }
}
