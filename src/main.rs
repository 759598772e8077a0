use hirescribe::{app, config::AppConfig, db::Database, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "hirescribe=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = AppConfig::from_env()?;
    if config.gemini.api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY not set; /generate will fail until it is configured");
    }

    let db = Database::connect(&config).await?;
    db.migrate().await?;

    let state = AppState::init(config, &db)?;
    let result = app::serve(app::build_app(state)).await;

    db.close().await;
    result
}
