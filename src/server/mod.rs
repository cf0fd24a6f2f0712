pub mod error;
pub mod handlers;
pub mod models;

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::inference::{InferenceError, OnnxTagger};
use crate::pipeline::Extractor;
use crate::utils::config::AppConfig;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub extractor: Arc<Extractor>,
}

impl AppState {
    pub fn new(extractor: Extractor) -> Self {
        Self {
            extractor: Arc::new(extractor),
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/v1/extract", post(handlers::extract_fields))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Loads the tagger model and wraps it in an extractor.
pub fn initialize_extractor(config: &AppConfig) -> Result<Extractor, InferenceError> {
    tracing::info!("Loading tagger model from {}...", config.model_path);
    let tagger = OnnxTagger::from_config(config)?;
    tracing::info!(
        "Tagger loaded with {} classes",
        config.field_names.len() + 1
    );

    Ok(Extractor::from_config(Box::new(tagger), config))
}

pub async fn start_server(
    addr: SocketAddr,
    state: AppState,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Starting server on {}", addr);

    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("API endpoint: http://{}/api/v1/extract", addr);
    tracing::info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
