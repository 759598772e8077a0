//! Job-description generation: prompt construction, the model call, and
//! recovery of the structured result from free-form model output.

use std::sync::Arc;

use axum::Router;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::{jobs::repo_types::GeneratedContent, state::AppState};

pub mod client;
pub mod handlers;
pub mod parse;
pub mod prompts;

pub use client::{GeminiClient, LlmClient};

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("GEMINI_API_KEY is not configured")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("model returned no text")]
    EmptyResponse,

    #[error("no JSON object in model response")]
    NoJsonObject,

    #[error("unexpected response shape: {0}")]
    Malformed(String),
}

impl GenerationError {
    /// True when the failure comes from process configuration rather than the call itself.
    pub fn is_configuration(&self) -> bool {
        matches!(self, GenerationError::MissingApiKey)
    }
}

/// Structured inputs for one posting.
#[derive(Debug, Clone)]
pub struct JobPostingInput {
    pub job_title: String,
    pub tech_stack: Vec<String>,
    pub experience_level: String,
    pub work_mode: String,
    pub about_company: Option<String>,
}

/// Turns posting inputs into generated content through an [`LlmClient`].
#[derive(Clone)]
pub struct JobDescriptionGenerator {
    llm: Arc<dyn LlmClient>,
}

impl JobDescriptionGenerator {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    #[instrument(skip(self, input), fields(job_title = %input.job_title))]
    pub async fn generate(&self, input: &JobPostingInput) -> Result<GeneratedContent, GenerationError> {
        let prompt = prompts::job_description_prompt(input);
        let text = self.llm.complete(&prompt).await?;
        match parse::parse_generated_content(&text) {
            Ok(content) => {
                info!(
                    responsibilities = content.responsibilities.len(),
                    skills = content.required_skills.len(),
                    benefits = content.benefits.len(),
                    "job description generated"
                );
                Ok(content)
            }
            Err(e) => {
                warn!(error = %e, response_len = text.len(), "could not parse model response");
                Err(e)
            }
        }
    }
}

pub fn router() -> Router<AppState> {
    handlers::generate_routes()
}
