//! Route configuration and setup

use crate::constants::{HEALTH_PATH, UPLOAD_PATH};
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use pixconv_core::Config;
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;
    let body_limit = config.max_body_bytes();

    // Server-level concurrency limit, off unless configured
    let http_concurrency_limit =
        concurrency_limit(std::env::var("HTTP_CONCURRENCY_LIMIT").ok().as_deref());

    tracing::info!(
        http_concurrency_limit = ?http_concurrency_limit,
        max_body_bytes = body_limit,
        max_files = config.upload_max_files,
        "Request body limit configured"
    );

    let mut app = Router::new()
        .route(HEALTH_PATH, get(handlers::health::liveness_check))
        .route(UPLOAD_PATH, post(handlers::upload::upload_files))
        // The tower-http limit below replaces axum's 2 MB multipart default
        .layer(DefaultBodyLimit::disable());

    if let Some(limit) = http_concurrency_limit {
        app = app.layer(ConcurrencyLimitLayer::new(limit));
    }

    let app = app
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

/// Parse `HTTP_CONCURRENCY_LIMIT`. Unset or unparsable means no limit.
fn concurrency_limit(value: Option<&str>) -> Option<usize> {
    let raw = value?.trim();
    match raw.parse::<usize>() {
        Ok(limit) => Some(limit.max(1)),
        Err(_) => {
            tracing::warn!(value = raw, "Ignoring invalid HTTP_CONCURRENCY_LIMIT");
            None
        }
    }
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}
