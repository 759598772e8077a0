use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use time::OffsetDateTime;
use uuid::Uuid;

/// Model-written body of a job posting. Every value is plain text and is
/// stored and returned exactly as received. All four keys must be present.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedContent {
    pub about_us: String,
    pub responsibilities: Vec<String>,
    pub required_skills: Vec<String>,
    pub benefits: Vec<String>,
}

/// What a record represents. Storage keeps two independent flags; every write
/// goes through this enum so that at most one of them is ever set.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Draft,
    Competitor,
    Final,
}

impl RecordKind {
    /// `(is_draft, is_competitor)`
    pub fn flags(self) -> (bool, bool) {
        match self {
            RecordKind::Draft => (true, false),
            RecordKind::Competitor => (false, true),
            RecordKind::Final => (false, false),
        }
    }

    pub fn from_flags(is_draft: bool, is_competitor: bool) -> Self {
        match (is_draft, is_competitor) {
            (_, true) => RecordKind::Competitor,
            (true, false) => RecordKind::Draft,
            (false, false) => RecordKind::Final,
        }
    }
}

/// Which owned records a listing returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobFilter {
    Drafts,
    Competitors,
}

impl JobFilter {
    /// Boolean column a listing selects on.
    pub fn column(self) -> &'static str {
        match self {
            JobFilter::Drafts => "is_draft",
            JobFilter::Competitors => "is_competitor",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct JobDescription {
    pub id: Uuid,
    pub user_id: Uuid,
    pub job_title: String,
    pub tech_stack: Vec<String>,
    pub experience_level: String,
    pub work_mode: String,
    pub about_company: Option<String>,
    pub generated_content: GeneratedContent,
    pub is_draft: bool,
    #[serde(rename = "isCompetitorJD")]
    pub is_competitor: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl JobDescription {
    pub fn kind(&self) -> RecordKind {
        RecordKind::from_flags(self.is_draft, self.is_competitor)
    }
}

/// Input for a new record. The owner is passed separately by the caller.
#[derive(Debug, Clone)]
pub struct NewJobDescription {
    pub job_title: String,
    pub tech_stack: Vec<String>,
    pub experience_level: String,
    pub work_mode: String,
    pub about_company: Option<String>,
    pub generated_content: GeneratedContent,
    pub kind: RecordKind,
}

/// Partial update. `None` leaves the stored value untouched; for `about_company`,
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct JobUpdate {
    pub job_title: Option<String>,
    pub tech_stack: Option<Vec<String>>,
    pub experience_level: Option<String>,
    pub work_mode: Option<String>,
    pub about_company: Option<Option<String>>,
    pub generated_content: Option<GeneratedContent>,
    pub is_draft: Option<bool>,
}

impl JobUpdate {
    pub fn is_empty(&self) -> bool {
        self.job_title.is_none()
            && self.tech_stack.is_none()
            && self.experience_level.is_none()
            && self.work_mode.is_none()
            && self.about_company.is_none()
            && self.generated_content.is_none()
            && self.is_draft.is_none()
    }
}

/// Row shape in the `job_descriptions` table.
#[derive(Debug, FromRow)]
pub struct JobDescriptionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub job_title: String,
    pub tech_stack: Vec<String>,
    pub experience_level: String,
    pub work_mode: String,
    pub about_company: Option<String>,
    pub generated_content: Json<GeneratedContent>,
    pub is_draft: bool,
    pub is_competitor: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<JobDescriptionRow> for JobDescription {
    fn from(r: JobDescriptionRow) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            job_title: r.job_title,
            tech_stack: r.tech_stack,
            experience_level: r.experience_level,
            work_mode: r.work_mode,
            about_company: r.about_company,
            generated_content: r.generated_content.0,
            is_draft: r.is_draft,
            is_competitor: r.is_competitor,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}
