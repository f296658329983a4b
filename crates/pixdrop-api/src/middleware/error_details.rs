//! Error detail exposure, decided per application from its [`Config`].
//!
//! [`Config`]: pixdrop_core::Config

use crate::error::ErrorDetails;
use axum::{
    body::Body,
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

#[derive(Debug, Clone, Copy)]
pub struct ErrorDetailsConfig {
    pub is_production: bool,
}

impl ErrorDetailsConfig {
    pub fn new(is_production: bool) -> Self {
        Self { is_production }
    }
}

/// Outside production, replace an error body with its detailed form.
/// In production the public body is kept as is.
pub async fn error_details_middleware(
    State(config): State<ErrorDetailsConfig>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    let Some(ErrorDetails(detailed)) = response.extensions_mut().remove::<ErrorDetails>() else {
        return response;
    };
    if config.is_production {
        return response;
    }

    match serde_json::to_vec(&detailed) {
        Ok(body) => {
            response.headers_mut().remove(header::CONTENT_LENGTH);
            *response.body_mut() = Body::from(body);
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to serialize error details");
        }
    }

    response
}
