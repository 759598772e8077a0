use async_trait::async_trait;
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use super::repo_types::{JobDescription, JobDescriptionRow, JobFilter, JobUpdate, NewJobDescription};

/// Job-description storage. Every method takes the owner id and applies it
/// inside the query, so a foreign record looks exactly like a missing one.
#[async_trait]
pub trait JobDescriptionRepository: Send + Sync {
    async fn create(&self, owner: Uuid, new: NewJobDescription) -> anyhow::Result<JobDescription>;
    /// Owned records matching `filter`, newest first.
    async fn list_by_owner(&self, owner: Uuid, filter: JobFilter)
        -> anyhow::Result<Vec<JobDescription>>;
    async fn find_owned(&self, owner: Uuid, id: Uuid) -> anyhow::Result<Option<JobDescription>>;
    /// Applies `changes` to an owned, non-competitor record.
    async fn update_owned(
        &self,
        owner: Uuid,
        id: Uuid,
        changes: JobUpdate,
    ) -> anyhow::Result<Option<JobDescription>>;
    /// Returns `false` when nothing owned by `owner` had that id.
    async fn delete_owned(&self, owner: Uuid, id: Uuid) -> anyhow::Result<bool>;
}

const JOB_COLUMNS: &str = "id, user_id, job_title, tech_stack, experience_level, work_mode, \
     about_company, generated_content, is_draft, is_competitor, created_at, updated_at";

#[derive(Clone)]
pub struct PgJobDescriptionRepository {
    db: PgPool,
}

impl PgJobDescriptionRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl JobDescriptionRepository for PgJobDescriptionRepository {
    async fn create(&self, owner: Uuid, new: NewJobDescription) -> anyhow::Result<JobDescription> {
        let (is_draft, is_competitor) = new.kind.flags();
        let row = sqlx::query_as::<_, JobDescriptionRow>(&format!(
            r#"
            INSERT INTO job_descriptions
                (id, user_id, job_title, tech_stack, experience_level, work_mode,
                 about_company, generated_content, is_draft, is_competitor)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(owner)
        .bind(&new.job_title)
        .bind(&new.tech_stack)
        .bind(&new.experience_level)
        .bind(&new.work_mode)
        .bind(&new.about_company)
        .bind(Json(&new.generated_content))
        .bind(is_draft)
        .bind(is_competitor)
        .fetch_one(&self.db)
        .await?;
        Ok(row.into())
    }

    async fn list_by_owner(
        &self,
        owner: Uuid,
        filter: JobFilter,
    ) -> anyhow::Result<Vec<JobDescription>> {
        let flag = filter.column();
        let rows = sqlx::query_as::<_, JobDescriptionRow>(&format!(
            r#"
            SELECT {JOB_COLUMNS}
            FROM job_descriptions
            WHERE user_id = $1 AND {flag} = TRUE
            ORDER BY created_at DESC
            "#
        ))
        .bind(owner)
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_owned(&self, owner: Uuid, id: Uuid) -> anyhow::Result<Option<JobDescription>> {
        let row = sqlx::query_as::<_, JobDescriptionRow>(&format!(
            "SELECT {JOB_COLUMNS} FROM job_descriptions WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(Into::into))
    }

    async fn update_owned(
        &self,
        owner: Uuid,
        id: Uuid,
        changes: JobUpdate,
    ) -> anyhow::Result<Option<JobDescription>> {
        let set_about_company = changes.about_company.is_some();
        let row = sqlx::query_as::<_, JobDescriptionRow>(&format!(
            r#"
            UPDATE job_descriptions SET
                job_title = COALESCE($3, job_title),
                tech_stack = COALESCE($4, tech_stack),
                experience_level = COALESCE($5, experience_level),
                work_mode = COALESCE($6, work_mode),
                about_company = CASE WHEN $10 THEN $7 ELSE about_company END,
                generated_content = COALESCE($8, generated_content),
                is_draft = COALESCE($9, is_draft),
                updated_at = now()
            WHERE id = $1 AND user_id = $2 AND is_competitor = FALSE
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(owner)
        .bind(changes.job_title)
        .bind(changes.tech_stack)
        .bind(changes.experience_level)
        .bind(changes.work_mode)
        .bind(changes.about_company.flatten())
        .bind(changes.generated_content.map(Json))
        .bind(changes.is_draft)
        .bind(set_about_company)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(Into::into))
    }

    async fn delete_owned(&self, owner: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM job_descriptions WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
