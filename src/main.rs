use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use imposter::{api, config::ServerConfig, secret, state::AppState, ws};

#[tokio::main]
async fn main() {
    // Load .env file if present (before any env var reads)
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if .env doesn't exist, only log if it's a different issue
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "imposter=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Imposter...");

    let server_config = ServerConfig::from_env();

    // Initialize secret generation
    let secret_config = secret::SecretConfig::from_env();
    let provider = secret::SecretProvider::from_config(&secret_config);
    match provider.generator_name() {
        Some(name) => tracing::info!("Secret words will be generated by {}", name),
        None => tracing::warn!(
            "No secret generator configured (set OPENAI_API_KEY or OLLAMA_BASE_URL). \
             Using the built-in word pool."
        ),
    }

    let state = Arc::new(AppState::new(provider));

    let app = Router::new()
        .route("/ws", get(ws::ws_handler))
        .route("/api/health", get(api::health))
        .fallback_service(ServeDir::new(&server_config.static_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = server_config.addr();
    tracing::info!("Listening on http://{}", addr);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
