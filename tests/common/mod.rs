#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use hirescribe::{
    app::build_app,
    auth::claims::Role,
    config::{AppConfig, GeminiConfig, JwtConfig},
    generation::{GenerationError, LlmClient},
    jobs::{
        repo::JobDescriptionRepository,
        repo_types::{JobDescription, JobFilter, JobUpdate, NewJobDescription},
    },
    state::AppState,
    users::{
        repo::{CreateUserError, UserRepository},
        repo_types::{NewUser, User, UserCredentials},
    },
};
use serde_json::Value;
use time::OffsetDateTime;
use tower::ServiceExt;
use uuid::Uuid;

pub const GOOD_MODEL_OUTPUT: &str = r#"Here you go:
```json
{"aboutUs":"We build hiring tools.","responsibilities":["Design APIs","Review code"],"requiredSkills":["Rust","PostgreSQL"],"benefits":["Remote work"]}
```"#;

#[derive(Default)]
pub struct InMemoryUsers {
    rows: Mutex<Vec<UserCredentials>>,
}

impl InMemoryUsers {
    pub fn stored_hash(&self, email: &str) -> Option<String> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.user.email == email)
            .map(|c| c.password_hash.clone())
    }

    pub fn update(&self, email: &str, f: impl FnOnce(&mut User)) {
        let mut rows = self.rows.lock().unwrap();
        let creds = rows
            .iter_mut()
            .find(|c| c.user.email == email)
            .expect("user exists");
        f(&mut creds.user);
    }
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn create(&self, new: NewUser) -> Result<User, CreateUserError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|c| c.user.email == new.email) {
            return Err(CreateUserError::EmailTaken);
        }
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: Uuid::new_v4(),
            name: new.name,
            email: new.email,
            role: new.role,
            is_active: true,
            avatar: None,
            created_at: now,
            updated_at: now,
        };
        rows.push(UserCredentials {
            user: user.clone(),
            password_hash: new.password_hash,
        });
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.user.email == email)
            .map(|c| c.user.clone()))
    }

    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> anyhow::Result<Option<UserCredentials>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.user.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.user.id == id)
            .map(|c| c.user.clone()))
    }

    async fn list(&self) -> anyhow::Result<Vec<User>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .rev()
            .map(|c| c.user.clone())
            .collect())
    }
}

/// Records kept newest first, mirroring the ordering of the SQL listing.
#[derive(Default)]
pub struct InMemoryJobs {
    rows: Mutex<Vec<JobDescription>>,
}

impl InMemoryJobs {
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

fn listed_under(filter: JobFilter, record: &JobDescription) -> bool {
    match filter {
        JobFilter::Drafts => record.is_draft,
        JobFilter::Competitors => record.is_competitor,
    }
}

#[async_trait]
impl JobDescriptionRepository for InMemoryJobs {
    async fn create(&self, owner: Uuid, new: NewJobDescription) -> anyhow::Result<JobDescription> {
        let (is_draft, is_competitor) = new.kind.flags();
        let now = OffsetDateTime::now_utc();
        let record = JobDescription {
            id: Uuid::new_v4(),
            user_id: owner,
            job_title: new.job_title,
            tech_stack: new.tech_stack,
            experience_level: new.experience_level,
            work_mode: new.work_mode,
            about_company: new.about_company,
            generated_content: new.generated_content,
            is_draft,
            is_competitor,
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().insert(0, record.clone());
        Ok(record)
    }

    async fn list_by_owner(
        &self,
        owner: Uuid,
        filter: JobFilter,
    ) -> anyhow::Result<Vec<JobDescription>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == owner && listed_under(filter, r))
            .cloned()
            .collect())
    }

    async fn find_owned(&self, owner: Uuid, id: Uuid) -> anyhow::Result<Option<JobDescription>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id && r.user_id == owner)
            .cloned())
    }

    async fn update_owned(
        &self,
        owner: Uuid,
        id: Uuid,
        changes: JobUpdate,
    ) -> anyhow::Result<Option<JobDescription>> {
        let mut rows = self.rows.lock().unwrap();
        let Some(r) = rows
            .iter_mut()
            .find(|r| r.id == id && r.user_id == owner && !r.is_competitor)
        else {
            return Ok(None);
        };
        if let Some(v) = changes.job_title {
            r.job_title = v;
        }
        if let Some(v) = changes.tech_stack {
            r.tech_stack = v;
        }
        if let Some(v) = changes.experience_level {
            r.experience_level = v;
        }
        if let Some(v) = changes.work_mode {
            r.work_mode = v;
        }
        if let Some(v) = changes.about_company {
            r.about_company = v;
        }
        if let Some(v) = changes.generated_content {
            r.generated_content = v;
        }
        if let Some(v) = changes.is_draft {
            r.is_draft = v;
        }
        r.updated_at = OffsetDateTime::now_utc();
        Ok(Some(r.clone()))
    }

    async fn delete_owned(&self, owner: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| !(r.id == id && r.user_id == owner));
        Ok(rows.len() != before)
    }
}

pub enum Script {
    Reply(String),
    MissingKey,
}

/// Model stand-in that returns a fixed reply and counts calls.
pub struct ScriptedLlm {
    script: Mutex<Script>,
    calls: AtomicUsize,
}

impl ScriptedLlm {
    pub fn new(script: Script) -> Self {
        Self {
            script: Mutex::new(script),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set(&self, script: Script) {
        *self.script.lock().unwrap() = script;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn complete(&self, _prompt: &str) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &*self.script.lock().unwrap() {
            Script::Reply(text) => Ok(text.clone()),
            Script::MissingKey => Err(GenerationError::MissingApiKey),
        }
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: "postgres://unused".into(),
        db_max_connections: 1,
        jwt: JwtConfig {
            secret: "integration-test-secret".into(),
            issuer: "hirescribe".into(),
            audience: "hirescribe-users".into(),
            ttl_minutes: 60,
        },
        gemini: GeminiConfig {
            api_key: None,
            model: "test-model".into(),
            api_url: "http://localhost".into(),
            timeout_secs: 1,
        },
        cookie_secure: false,
    }
}

pub struct TestApp {
    pub router: Router,
    pub users: Arc<InMemoryUsers>,
    pub jobs: Arc<InMemoryJobs>,
    pub llm: Arc<ScriptedLlm>,
}

impl TestApp {
    pub fn new() -> Self {
        let users = Arc::new(InMemoryUsers::default());
        let jobs = Arc::new(InMemoryJobs::default());
        let llm = Arc::new(ScriptedLlm::new(Script::Reply(GOOD_MODEL_OUTPUT.into())));
        let state = AppState::from_parts(
            test_config(),
            users.clone(),
            jobs.clone(),
            llm.clone(),
        );
        Self {
            router: build_app(state),
            users,
            jobs,
            llm,
        }
    }

    /// Sends a request, authenticating through the `token` cookie when given.
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::COOKIE, format!("token={token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        self.router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap()
    }

    /// Registers an account and returns its session token.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> String {
        let res = self
            .request(
                "POST",
                "/auth/register",
                Some(serde_json::json!({ "name": name, "email": email, "password": password })),
                None,
            )
            .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        token_cookie(&res).expect("registration sets the token cookie")
    }

    pub async fn login(&self, email: &str, password: &str) -> Response {
        self.request(
            "POST",
            "/auth/login",
            Some(serde_json::json!({ "email": email, "password": password })),
            None,
        )
        .await
    }

    /// Registers an account, promotes it in storage, and logs in again.
    pub async fn admin(&self, email: &str) -> String {
        self.register("Admin", email, "admin-pass").await;
        self.users.update(email, |u| u.role = Role::Admin);
        let res = self.login(email, "admin-pass").await;
        token_cookie(&res).expect("admin login sets the token cookie")
    }
}

/// Value of the `token` cookie set by the response, if any.
pub fn token_cookie(res: &Response) -> Option<String> {
    res.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|v| {
            let pair = v.split(';').next()?;
            let (name, value) = pair.split_once('=')?;
            (name.trim() == "token" && !value.is_empty()).then(|| value.to_string())
        })
}

pub fn set_cookie_header(res: &Response) -> Option<String> {
    res.headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

pub async fn parse_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
