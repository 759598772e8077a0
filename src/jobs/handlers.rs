use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{
        CompetitorListResponse, DeletedResponse, DraftListResponse, DraftResponse,
        SaveDraftRequest, SaveDraftResponse, SavedJobSummary, UpdateDraftRequest,
        UploadCompetitorRequest, UploadCompetitorResponse,
    },
    repo_types::{GeneratedContent, JobFilter, JobUpdate, NewJobDescription, RecordKind},
};
use crate::{auth::extractors::AuthUser, error::AppError, extract::ApiJson, state::AppState};

const NOT_SPECIFIED: &str = "Not specified";

pub fn draft_routes() -> Router<AppState> {
    Router::new()
        .route("/drafts", get(list_drafts).post(save_draft))
        .route(
            "/drafts/:id",
            get(get_draft).put(update_draft).delete(delete_draft),
        )
}

pub fn competitor_routes() -> Router<AppState> {
    Router::new().route("/competitors", get(list_competitors).post(upload_competitor))
}

#[instrument(skip(state, identity), fields(user_id = %identity.user_id))]
pub async fn list_drafts(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<DraftListResponse>, AppError> {
    let drafts = state
        .jobs
        .list_by_owner(identity.user_id, JobFilter::Drafts)
        .await?;
    Ok(Json(DraftListResponse { drafts }))
}

#[instrument(skip(state, identity, payload), fields(user_id = %identity.user_id))]
pub async fn save_draft(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    ApiJson(payload): ApiJson<SaveDraftRequest>,
) -> Result<(StatusCode, Json<SaveDraftResponse>), AppError> {
    let job_title = payload.job_title.trim();
    let experience_level = payload.experience_level.trim();
    let work_mode = payload.work_mode.trim();
    let generated_content = match payload.generated_content {
        Some(content)
            if !job_title.is_empty()
                && !experience_level.is_empty()
                && !work_mode.is_empty()
                && !content.about_us.trim().is_empty() =>
        {
            content
        }
        _ => return Err(AppError::Validation("Missing required fields".into())),
    };

    let record = state
        .jobs
        .create(
            identity.user_id,
            NewJobDescription {
                job_title: job_title.to_string(),
                tech_stack: clean_tags(payload.tech_stack),
                experience_level: experience_level.to_string(),
                work_mode: work_mode.to_string(),
                about_company: non_blank(payload.about_company),
                generated_content,
                kind: RecordKind::Draft,
            },
        )
        .await?;

    info!(id = %record.id, "draft saved");
    Ok((
        StatusCode::CREATED,
        Json(SaveDraftResponse {
            success: true,
            message: "Draft saved successfully",
            job_description: SavedJobSummary {
                id: record.id,
                job_title: record.job_title,
                created_at: record.created_at,
            },
        }),
    ))
}

#[instrument(skip(state, identity), fields(user_id = %identity.user_id))]
pub async fn get_draft(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<DraftResponse>, AppError> {
    let id = parse_record_id(&id)?;
    let draft = state
        .jobs
        .find_owned(identity.user_id, id)
        .await?
        .ok_or_else(draft_not_found)?;
    Ok(Json(DraftResponse { draft }))
}

#[instrument(skip(state, identity, payload), fields(user_id = %identity.user_id))]
pub async fn update_draft(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<UpdateDraftRequest>,
) -> Result<Json<DraftResponse>, AppError> {
    let id = parse_record_id(&id)?;

    let changes = JobUpdate {
        job_title: required_if_present(payload.job_title, "jobTitle")?,
        tech_stack: payload.tech_stack.map(clean_tags),
        experience_level: required_if_present(payload.experience_level, "experienceLevel")?,
        work_mode: required_if_present(payload.work_mode, "workMode")?,
        about_company: payload.about_company.map(non_blank),
        generated_content: payload.generated_content,
        is_draft: payload.is_draft,
    };
    if changes.is_empty() {
        return Err(AppError::Validation("No changes provided".into()));
    }

    let draft = state
        .jobs
        .update_owned(identity.user_id, id, changes)
        .await?
        .ok_or_else(draft_not_found)?;

    info!(id = %draft.id, kind = ?draft.kind(), "draft updated");
    Ok(Json(DraftResponse { draft }))
}

#[instrument(skip(state, identity), fields(user_id = %identity.user_id))]
pub async fn delete_draft(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<DeletedResponse>, AppError> {
    let id = parse_record_id(&id)?;
    if !state.jobs.delete_owned(identity.user_id, id).await? {
        return Err(draft_not_found());
    }
    info!(%id, "draft deleted");
    Ok(Json(DeletedResponse {
        message: "Draft deleted successfully",
    }))
}

#[instrument(skip(state, identity), fields(user_id = %identity.user_id))]
pub async fn list_competitors(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<CompetitorListResponse>, AppError> {
    let competitors = state
        .jobs
        .list_by_owner(identity.user_id, JobFilter::Competitors)
        .await?;
    Ok(Json(CompetitorListResponse { competitors }))
}

/// Stores a pasted competitor posting. The pasted text is kept as the about-us
/// body; the list fields start empty.
#[instrument(skip(state, identity, payload), fields(user_id = %identity.user_id))]
pub async fn upload_competitor(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    ApiJson(payload): ApiJson<UploadCompetitorRequest>,
) -> Result<(StatusCode, Json<UploadCompetitorResponse>), AppError> {
    let job_title = payload.job_title.trim();
    let company_name = payload.company_name.trim();
    if job_title.is_empty() || company_name.is_empty() || payload.job_description.trim().is_empty() {
        return Err(AppError::Validation("Missing required fields".into()));
    }

    let record = state
        .jobs
        .create(
            identity.user_id,
            NewJobDescription {
                job_title: job_title.to_string(),
                tech_stack: clean_tags(payload.tech_stack),
                experience_level: non_blank(payload.experience_level)
                    .unwrap_or_else(|| NOT_SPECIFIED.to_string()),
                work_mode: non_blank(payload.work_mode)
                    .unwrap_or_else(|| NOT_SPECIFIED.to_string()),
                about_company: Some(company_name.to_string()),
                generated_content: GeneratedContent {
                    about_us: payload.job_description,
                    ..Default::default()
                },
                kind: RecordKind::Competitor,
            },
        )
        .await?;

    info!(id = %record.id, "competitor posting uploaded");
    Ok((
        StatusCode::CREATED,
        Json(UploadCompetitorResponse {
            success: true,
            message: "Competitor JD uploaded successfully",
            id: record.id,
        }),
    ))
}

/// A malformed id can't match any record, so it is reported the same way as a missing one.
fn parse_record_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| {
        warn!(id = raw, "malformed record id");
        draft_not_found()
    })
}

fn draft_not_found() -> AppError {
    AppError::NotFound("Draft not found".into())
}

fn clean_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn required_if_present(value: Option<String>, field: &str) -> Result<Option<String>, AppError> {
    match value.map(|s| s.trim().to_string()) {
        Some(s) if s.is_empty() => Err(AppError::Validation(format!("{field} must not be empty"))),
        other => Ok(other),
    }
}
