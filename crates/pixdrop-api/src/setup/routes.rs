//! Route configuration and setup

use crate::handlers;
use crate::middleware::{error_details_middleware, ErrorDetailsConfig};
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use pixdrop_core::constants::{IMAGES_PATH, UPLOADS_PATH};
use pixdrop_core::Config;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Room for multipart boundaries and part headers on top of the file itself
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    let body_limit = config
        .max_file_size_bytes()
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    let app = Router::new()
        .route("/upload", post(handlers::image_upload::upload_image))
        .route(
            &format!("{}/{{filename}}", IMAGES_PATH),
            get(handlers::image_get::get_image),
        )
        .route(
            &format!("{}/{{filename}}", UPLOADS_PATH),
            get(handlers::image_get::get_image),
        )
        .route("/health", get(handlers::health::health_check))
        .layer(axum::middleware::from_fn_with_state(
            ErrorDetailsConfig::new(config.is_production()),
            error_details_middleware,
        ))
        // Multipart reads past the limit fail with a JSON 413; the outer layer is a
        // hard cap for anything that never reaches an extractor.
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(RequestBodyLimitLayer::new(body_limit.saturating_mul(2)))
        .layer(cors)
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::POST];

    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|_| anyhow::anyhow!("Invalid CORS origin: {}", o))
            })
            .collect::<Result<Vec<HeaderValue>, _>>()?;

        tracing::info!(origins = ?config.cors_origins(), "CORS allow-list configured");

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}
