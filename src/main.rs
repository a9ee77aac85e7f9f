use std::sync::{Arc, Mutex};

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use concierge::config::AppConfig;
use concierge::db;
use concierge::handlers;
use concierge::services::ai::anthropic::AnthropicProvider;
use concierge::services::ai::LlmProvider;
use concierge::services::catalog::sqlite::SqliteCatalog;
use concierge::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;
    let db = Arc::new(Mutex::new(conn));

    let llm: Option<Box<dyn LlmProvider>> = match config.llm_provider.as_str() {
        "anthropic" => {
            anyhow::ensure!(
                !config.anthropic_api_key.is_empty(),
                "ANTHROPIC_API_KEY must be set when LLM_PROVIDER=anthropic"
            );
            tracing::info!("using Anthropic narrative provider (model: {})", config.anthropic_model);
            Some(Box::new(AnthropicProvider::new(
                config.anthropic_api_key.clone(),
                config.anthropic_model.clone(),
            )))
        }
        _ => {
            tracing::info!("no LLM provider configured, replies use plain summaries");
            None
        }
    };

    let state = Arc::new(AppState {
        db: Arc::clone(&db),
        config: config.clone(),
        catalog: Box::new(SqliteCatalog::new(db)),
        llm,
    });

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/chat", post(handlers::chat::chat))
        .route("/api/search", post(handlers::search::search))
        .route(
            "/api/listings/:category",
            get(handlers::listings::list_category),
        )
        .route("/api/admin/status", get(handlers::admin::get_status))
        .route("/api/admin/seed", post(handlers::admin::seed_inventory))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
