use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use impostor::{api, config::ServerConfig, random, state::AppState, words::WordBank, ws};

#[tokio::main]
async fn main() {
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

    tracing::info!("Starting impostor server...");

    let config = ServerConfig::from_env();

    let words = match &config.words_path {
        Some(path) => match WordBank::from_file(path) {
            Ok(bank) => {
                tracing::info!("Loaded {} words from {}", bank.len(), path.display());
                bank
            }
            Err(e) => {
                tracing::warn!("{}. Using the built-in word list.", e);
                WordBank::builtin()
            }
        },
        None => WordBank::builtin(),
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let static_dir = config.static_dir.clone();
    let state = Arc::new(AppState::with_parts(config, words, random::from_entropy()));

    let app = Router::new()
        .route("/ws", get(ws::ws_handler))
        .route("/api/rooms", get(api::list_rooms))
        .fallback_service(ServeDir::new(static_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    tracing::info!("Listening on http://{}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
    }
}
