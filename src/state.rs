use std::sync::Arc;

use crate::{
    auth::jwt::JwtKeys,
    config::AppConfig,
    db::Database,
    generation::{GeminiClient, JobDescriptionGenerator, LlmClient},
    jobs::repo::{JobDescriptionRepository, PgJobDescriptionRepository},
    users::repo::{PgUserRepository, UserRepository},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub jwt: JwtKeys,
    pub users: Arc<dyn UserRepository>,
    pub jobs: Arc<dyn JobDescriptionRepository>,
    pub generator: JobDescriptionGenerator,
}

impl AppState {
    pub fn init(config: AppConfig, db: &Database) -> anyhow::Result<Self> {
        let llm = Arc::new(GeminiClient::new(&config.gemini)?) as Arc<dyn LlmClient>;
        let users = Arc::new(PgUserRepository::new(db.pool().clone())) as Arc<dyn UserRepository>;
        let jobs = Arc::new(PgJobDescriptionRepository::new(db.pool().clone()))
            as Arc<dyn JobDescriptionRepository>;
        Ok(Self::from_parts(config, users, jobs, llm))
    }

    pub fn from_parts(
        config: AppConfig,
        users: Arc<dyn UserRepository>,
        jobs: Arc<dyn JobDescriptionRepository>,
        llm: Arc<dyn LlmClient>,
    ) -> Self {
        Self {
            jwt: JwtKeys::from_config(&config.jwt),
            config: Arc::new(config),
            users,
            jobs,
            generator: JobDescriptionGenerator::new(llm),
        }
    }
}
