use anyhow::Context;
use serde::Deserialize;

/// Longest accepted session lifetime: one year.
pub const MAX_TOKEN_TTL_MINUTES: i64 = 60 * 24 * 365;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

/// Settings for the text-generation backend. The API key is optional here:
/// a missing key only fails the first generation request, not startup.
#[derive(Debug, Clone, Deserialize)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub api_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub jwt: JwtConfig,
    pub gemini: GeminiConfig,
    pub cookie_secure: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

        let secret = std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
        if secret.trim().is_empty() {
            anyhow::bail!("JWT_SECRET must not be empty");
        }

        let jwt = JwtConfig {
            secret,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "hirescribe".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "hirescribe-users".into()),
            ttl_minutes: token_ttl_minutes(env_parse("JWT_TTL_MINUTES"))?,
        };

        let gemini = GeminiConfig {
            api_key: std::env::var("GEMINI_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            model: std::env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-1.5-flash".into()),
            api_url: std::env::var("GEMINI_API_URL").unwrap_or_else(|_| {
                "https://generativelanguage.googleapis.com/v1beta/models".into()
            }),
            timeout_secs: env_parse("GEMINI_TIMEOUT_SECS").unwrap_or(60),
        };

        Ok(Self {
            database_url,
            db_max_connections: env_parse("DB_MAX_CONNECTIONS").unwrap_or(10),
            jwt,
            gemini,
            cookie_secure: env_parse("COOKIE_SECURE").unwrap_or(false),
        })
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse::<T>().ok())
}

fn token_ttl_minutes(raw: Option<i64>) -> anyhow::Result<i64> {
    let minutes = raw.unwrap_or(60 * 24 * 7);
    if !(1..=MAX_TOKEN_TTL_MINUTES).contains(&minutes) {
        anyhow::bail!("JWT_TTL_MINUTES must be between 1 and {MAX_TOKEN_TTL_MINUTES}, got {minutes}");
    }
    Ok(minutes)
}
