use axum::{
    extract::{Multipart, Query, State},
    Json,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::selection::MatchedJob;
use crate::matching::{MatchOptions, ResumeMatchOptions};
use crate::models::job::ExperienceLevel;
use crate::resume::analyzer::{analyze_resume_text, generate_search_keywords, ResumeAnalysis};
use crate::resume::extract::{parse_resume_buffer, ResumeFormat};
use crate::routes::int_param;
use crate::state::AppState;

const UPLOAD_MATCH_LIMIT: usize = 15;
const UPLOAD_TOP_MATCHES: usize = 5;
const DEFAULT_MATCH_LIMIT: usize = 15;
const MAX_MATCH_LIMIT: usize = 50;
const DEFAULT_MIN_SCORE: u32 = 20;

#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Upload
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub skills: Vec<String>,
    pub skill_count: usize,
    pub preferred_roles: Vec<String>,
    pub experience_level: ExperienceLevel,
    pub years_of_experience: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopMatch {
    pub id: Uuid,
    pub title: String,
    pub company: Option<String>,
    pub match_score: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub message: String,
    pub analysis: AnalysisSummary,
    pub matched_jobs_count: usize,
    pub top_matches: Vec<TopMatch>,
}

struct UploadedFile {
    file_name: Option<String>,
    mime: String,
    bytes: Bytes,
}

/// Pulls the `file` part out of the form, checking type and size before parsing.
async fn read_resume_part(mut multipart: Multipart, max_bytes: usize) -> Result<UploadedFile, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let mime = field.content_type().unwrap_or_default().to_string();
        ResumeFormat::from_mime(&mime)?;
        let file_name = field.file_name().map(str::to_string);

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read uploaded file: {e}")))?;
        if bytes.len() > max_bytes {
            return Err(AppError::PayloadTooLarge(max_bytes));
        }
        if bytes.is_empty() {
            return Err(AppError::Validation("Uploaded file is empty".to_string()));
        }

        return Ok(UploadedFile {
            file_name,
            mime,
            bytes,
        });
    }

    Err(AppError::Validation(
        "Missing required multipart field: file".to_string(),
    ))
}

/// POST /api/v1/resume/upload?user_id=
pub async fn handle_upload(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let upload = read_resume_part(multipart, state.config.max_resume_bytes).await?;
    let size = upload.bytes.len();

    let mime = upload.mime.clone();
    let analysis: ResumeAnalysis =
        tokio::task::spawn_blocking(move || parse_resume_buffer(&upload.bytes, &mime))
            .await
            .map_err(|e| AppError::Decode(format!("Resume parsing was aborted: {e}")))??;

    let matcher = state.matcher();
    matcher
        .update_user_from_resume(params.user_id, &analysis, upload.file_name.clone())
        .await?;

    let matched = matcher
        .get_jobs_from_resume_analysis(
            &analysis,
            ResumeMatchOptions {
                limit: UPLOAD_MATCH_LIMIT,
                ..Default::default()
            },
        )
        .await?;

    info!(
        user_id = %params.user_id,
        mime = %upload.mime,
        size,
        skills = analysis.skill_count,
        matches = matched.len(),
        "Resume uploaded and analyzed"
    );

    Ok(Json(UploadResponse {
        message: "Resume analyzed successfully".to_string(),
        matched_jobs_count: matched.len(),
        top_matches: matched
            .into_iter()
            .take(UPLOAD_TOP_MATCHES)
            .map(|m| TopMatch {
                id: m.job.id,
                title: m.job.title,
                company: m.job.company.map(|c| c.name),
                match_score: m.match_score,
            })
            .collect(),
        analysis: AnalysisSummary {
            skills: analysis.skills,
            skill_count: analysis.skill_count,
            preferred_roles: analysis.preferred_roles,
            experience_level: analysis.experience_level,
            years_of_experience: analysis.years_of_experience,
        },
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Text analysis
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnalyzeTextRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeTextResponse {
    pub analysis: ResumeAnalysis,
    pub search_keywords: Vec<String>,
}

/// POST /api/v1/resume/analyze-text
pub async fn handle_analyze_text(
    Json(req): Json<AnalyzeTextRequest>,
) -> Result<Json<AnalyzeTextResponse>, AppError> {
    if req.text.trim().is_empty() {
        return Err(AppError::Validation(
            "Missing or invalid text field".to_string(),
        ));
    }

    let analysis = analyze_resume_text(&req.text);
    let search_keywords = generate_search_keywords(&analysis);
    Ok(Json(AnalyzeTextResponse {
        analysis,
        search_keywords,
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Matched jobs
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedJobsQuery {
    #[serde(rename = "user_id")]
    pub user_id: Uuid,
    pub limit: Option<String>,
    pub min_score: Option<String>,
    pub exclude_seen: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MatchedJobsResponse {
    pub total: usize,
    pub jobs: Vec<MatchedJob>,
}

/// GET /api/v1/resume/matched-jobs
pub async fn handle_matched_jobs(
    State(state): State<AppState>,
    Query(params): Query<MatchedJobsQuery>,
) -> Result<Json<MatchedJobsResponse>, AppError> {
    let limit = int_param(params.limit.as_deref())
        .filter(|l| *l > 0)
        .map_or(DEFAULT_MATCH_LIMIT, |l| l as usize)
        .min(MAX_MATCH_LIMIT);
    let min_score = int_param(params.min_score.as_deref())
        .filter(|s| *s > 0)
        .map_or(DEFAULT_MIN_SCORE, |s| s.min(100) as u32);
    let exclude_seen = params.exclude_seen.as_deref() != Some("false");

    let matcher = state.matcher();
    let user = matcher.find_user(params.user_id).await?;
    if !user.has_resume() {
        return Err(AppError::NeedsResume);
    }

    let mut rng = StdRng::from_entropy();
    let jobs = matcher
        .get_matched_jobs(
            user.id,
            MatchOptions {
                limit,
                min_score,
                exclude_seen,
            },
            &mut rng,
        )
        .await?;

    Ok(Json(MatchedJobsResponse {
        total: jobs.len(),
        jobs,
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Status / delete
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeStatusDetail {
    pub skills: Vec<String>,
    pub preferred_roles: Vec<String>,
    pub experience_level: Option<ExperienceLevel>,
    pub years_of_experience: Option<u32>,
    pub file_name: Option<String>,
    pub analyzed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeStatusResponse {
    pub has_resume: bool,
    pub resume_analysis: Option<ResumeStatusDetail>,
}

/// GET /api/v1/resume/status
pub async fn handle_resume_status(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ResumeStatusResponse>, AppError> {
    let user = state.matcher().find_user(params.user_id).await?;
    let has_resume = user.has_resume();

    let resume_analysis = user
        .resume_analysis
        .filter(|_| has_resume)
        .map(|r| ResumeStatusDetail {
            skills: r.skills,
            preferred_roles: r.preferred_roles,
            experience_level: r.experience_level,
            years_of_experience: r.years_of_experience,
            file_name: r.resume_file_name,
            analyzed_at: r.analyzed_at,
        });

    Ok(Json(ResumeStatusResponse {
        has_resume,
        resume_analysis,
    }))
}

/// DELETE /api/v1/resume
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<MessageResponse>, AppError> {
    state.matcher().clear_resume(params.user_id).await?;
    Ok(Json(MessageResponse {
        message: "Resume data deleted successfully".to_string(),
    }))
}
