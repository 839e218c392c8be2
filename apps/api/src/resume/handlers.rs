//! Axum route handler for resume uploads.

use aws_sdk_s3::primitives::ByteStream;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use bytes::Bytes;
use chrono::Utc;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::access::require_role;
use crate::errors::AppError;
use crate::extract::AppQuery;
use crate::models::talent::TalentProfile;
use crate::models::user::UserRole;
use crate::profiles::completeness::profile_completion;
use crate::profiles::handlers::{ProfileResponse, UserIdQuery};
use crate::resume::parser::{
    extract_text, merge_parsed_resume, truncate_for_prompt, ParsedResume, ResumeFormat,
    MAX_RESUME_BYTES,
};
use crate::resume::prompts::{RESUME_PARSE_PROMPT, RESUME_PARSE_SYSTEM};
use crate::state::AppState;

#[derive(Serialize)]
pub struct ResumeUploadResponse {
    pub resume_url: String,
    pub parsed: ParsedResume,
    #[serde(flatten)]
    pub profile: ProfileResponse,
}

struct UploadedFile {
    format: ResumeFormat,
    data: Bytes,
}

/// POST /api/v1/talent/resume
///
/// Extracts the text, stores the file, has the model pull profile fields from
/// the text, and merges them into the talent's profile.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<UserIdQuery>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ResumeUploadResponse>, AppError> {
    let multipart = multipart.map_err(|e| AppError::Validation(e.body_text()))?;
    require_role(state.store.as_ref(), params.user_id, &[UserRole::Talent]).await?;

    let file = read_resume_field(multipart).await?;

    // Unreadable files are rejected before anything is stored.
    let text = extract_text(file.format, file.data.clone()).await?;

    let key = format!(
        "resumes/{}/{}.{}",
        params.user_id,
        Uuid::new_v4(),
        file.format.extension()
    );
    state
        .s3
        .put_object()
        .bucket(&state.config.s3_bucket)
        .key(&key)
        .body(ByteStream::from(file.data))
        .content_type(file.format.content_type())
        .send()
        .await
        .map_err(|e| AppError::S3(format!("Resume upload failed: {e}")))?;
    let resume_url = format!("s3://{}/{}", state.config.s3_bucket, key);
    info!("Uploaded resume to {resume_url}");

    let prompt = RESUME_PARSE_PROMPT.replace("{resume_text}", truncate_for_prompt(&text));
    let parsed: ParsedResume = state
        .llm
        .call_json(&prompt, RESUME_PARSE_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Failed to parse resume: {e}")))?;

    let existing = state
        .store
        .fetch_talent_profile(params.user_id)
        .await?
        .unwrap_or_else(|| TalentProfile::empty(params.user_id));

    let mut profile = merge_parsed_resume(existing, parsed.clone());
    profile.resume_url = Some(resume_url.clone());
    profile.profile_completion_percentage = profile_completion(&profile);
    profile.updated_at = Utc::now();

    let saved = state.store.upsert_talent_profile(&profile).await?;
    info!(
        "Merged resume into profile {} ({} skills, {}% complete)",
        saved.user_id,
        saved.skills.len(),
        saved.profile_completion_percentage
    );

    Ok(Json(ResumeUploadResponse {
        resume_url,
        parsed,
        profile: saved.into(),
    }))
}

/// Takes the first `file` (or `resume`) field and checks its type and size.
async fn read_resume_field(mut multipart: Multipart) -> Result<UploadedFile, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if !matches!(field.name(), Some("file") | Some("resume")) {
            continue;
        }

        let format = ResumeFormat::detect(field.content_type(), field.file_name())
            .ok_or_else(|| {
                AppError::Validation("Only PDF and plain text resumes are supported".to_string())
            })?;
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Could not read upload: {e}")))?;

        return check_upload(format, data);
    }

    Err(AppError::Validation("No resume file provided".to_string()))
}

fn check_upload(format: ResumeFormat, data: Bytes) -> Result<UploadedFile, AppError> {
    if data.is_empty() {
        return Err(AppError::Validation("Resume file is empty".to_string()));
    }
    if data.len() > MAX_RESUME_BYTES {
        return Err(AppError::Validation(
            "File too large. Maximum size is 5MB".to_string(),
        ));
    }
    Ok(UploadedFile { format, data })
}
