use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use impostor::{app, config::ServerConfig, llm, state::AppState, store::JsonFileRepository};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present (before any env var reads)
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if .env doesn't exist, only log if it's a different issue
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "impostor=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Impostor...");

    let config = ServerConfig::from_env();
    let repo = Arc::new(JsonFileRepository::new(&config.data_dir));
    tracing::info!("Word library at {}", repo.path().display());

    let llm_config = llm::LlmConfig::from_env();
    let llm_manager = match llm_config.build_manager() {
        Ok(manager) => {
            tracing::info!("LLM providers initialized successfully");
            Some(manager)
        }
        Err(e) => {
            tracing::warn!(
                "Failed to initialize LLM providers: {}. Word and image generation will not be available.",
                e
            );
            None
        }
    };

    let state = Arc::new(AppState::with_parts(
        repo,
        llm_manager,
        StdRng::from_os_rng(),
    ));

    let app = app::build_router(state, &config.static_dir);

    tracing::info!("Listening on http://{}", config.addr);
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await
}
