use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::JobPostingInput;
use crate::{
    auth::extractors::AuthUser, error::AppError, extract::ApiJson,
    jobs::repo_types::GeneratedContent, state::AppState,
};

pub fn generate_routes() -> Router<AppState> {
    Router::new().route("/generate", post(generate))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GenerateRequest {
    pub job_title: String,
    pub tech_stack: Vec<String>,
    pub experience_level: String,
    pub work_mode: String,
    pub about_company: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub success: bool,
    pub job_description: GeneratedContent,
}

impl GenerateRequest {
    fn into_input(self) -> Result<JobPostingInput, AppError> {
        let job_title = self.job_title.trim().to_string();
        let experience_level = self.experience_level.trim().to_string();
        let work_mode = self.work_mode.trim().to_string();
        if job_title.is_empty() || experience_level.is_empty() || work_mode.is_empty() {
            return Err(AppError::Validation(
                "Job title, experience level, and work mode are required".into(),
            ));
        }
        Ok(JobPostingInput {
            job_title,
            tech_stack: self
                .tech_stack
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
            experience_level,
            work_mode,
            about_company: self
                .about_company
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        })
    }
}

#[instrument(skip(state, identity, payload), fields(user_id = %identity.user_id))]
pub async fn generate(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    ApiJson(payload): ApiJson<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    let input = payload.into_input()?;
    let job_description = state.generator.generate(&input).await?;
    Ok(Json(GenerateResponse {
        success: true,
        job_description,
    }))
}
