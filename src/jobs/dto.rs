use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::{GeneratedContent, JobDescription};

/// POST /drafts
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SaveDraftRequest {
    pub job_title: String,
    pub tech_stack: Vec<String>,
    pub experience_level: String,
    pub work_mode: String,
    pub about_company: Option<String>,
    pub generated_content: Option<GeneratedContent>,
}

/// PUT /drafts/{id}; omitted fields stay as stored. `aboutCompany: null` clears it.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateDraftRequest {
    pub job_title: Option<String>,
    pub tech_stack: Option<Vec<String>>,
    pub experience_level: Option<String>,
    pub work_mode: Option<String>,
    #[serde(deserialize_with = "present")]
    pub about_company: Option<Option<String>>,
    pub generated_content: Option<GeneratedContent>,
    pub is_draft: Option<bool>,
}

/// Tells an explicit `null` (`Some(None)`) apart from an absent key (`None`).
fn present<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

/// POST /competitors
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UploadCompetitorRequest {
    pub job_title: String,
    pub company_name: String,
    pub job_description: String,
    pub experience_level: Option<String>,
    pub work_mode: Option<String>,
    pub tech_stack: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedJobSummary {
    pub id: Uuid,
    pub job_title: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveDraftResponse {
    pub success: bool,
    pub message: &'static str,
    pub job_description: SavedJobSummary,
}

#[derive(Debug, Serialize)]
pub struct DraftListResponse {
    pub drafts: Vec<JobDescription>,
}

#[derive(Debug, Serialize)]
pub struct DraftResponse {
    pub draft: JobDescription,
}

#[derive(Debug, Serialize)]
pub struct CompetitorListResponse {
    pub competitors: Vec<JobDescription>,
}

#[derive(Debug, Serialize)]
pub struct UploadCompetitorResponse {
    pub success: bool,
    pub message: &'static str,
    pub id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub message: &'static str,
}
