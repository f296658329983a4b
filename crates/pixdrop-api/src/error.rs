//! HTTP error response conversion
//!
//! This module provides HTTP-specific error response conversion for AppError.
//!
//! **Handler pattern:** Return `Result<_, HttpAppError>`. Use `AppError` (or a domain
//! error with a `From` impl below) and `?` so every failure renders the same way
//! (status, body, logging).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pixdrop_core::{AppError, ErrorMetadata, LogLevel};
use pixdrop_processing::TranscodeError;
use pixdrop_storage::StorageError;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

impl ErrorResponse {
    fn from_app_error(app_error: &AppError, include_details: bool) -> Self {
        Self {
            error: app_error.client_message(),
            details: include_details.then(|| app_error.detailed_message()),
            error_type: include_details.then(|| app_error.error_type().to_string()),
            code: app_error.error_code().to_string(),
            recoverable: app_error.is_recoverable(),
            suggested_action: app_error.suggested_action().map(String::from),
        }
    }
}

/// Wrapper type for AppError to implement IntoResponse
/// (orphan rule: IntoResponse and AppError both live in other crates)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::from(err))
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(
                error = %error,
                details = %error.detailed_message(),
                error_type = error_type,
                "Error occurred"
            );
        }
    }
}

/// Full error body, attached to error responses as an extension.
///
/// The response body itself never carries details; outside production
/// [`crate::middleware::error_details`] swaps this in as the body.
#[derive(Debug, Clone)]
pub struct ErrorDetails(pub ErrorResponse);

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        let body = ErrorResponse::from_app_error(app_error, false);
        let mut response = (status, Json(body)).into_response();

        // Sensitive errors never expose details, whatever the environment
        if !app_error.is_sensitive() {
            response
                .extensions_mut()
                .insert(ErrorDetails(ErrorResponse::from_app_error(app_error, true)));
        }

        response
    }
}

// Convert domain errors to HttpAppError

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        let app = match err {
            StorageError::NotFound(msg) => AppError::NotFound(msg),
            StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
            StorageError::UploadFailed(msg) => AppError::Storage(msg),
            StorageError::DownloadFailed(msg) => AppError::Storage(msg),
            StorageError::BackendError(msg) => AppError::Storage(msg),
            StorageError::IoError(err) => AppError::Storage(format!("IO error: {}", err)),
            StorageError::ConfigError(msg) => AppError::Internal(msg),
        };
        HttpAppError(app)
    }
}

impl From<TranscodeError> for HttpAppError {
    fn from(err: TranscodeError) -> Self {
        HttpAppError(AppError::MediaConversion(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_storage_error_not_found() {
        let storage_err = StorageError::NotFound("missing.avif".to_string());
        let HttpAppError(app_err) = storage_err.into();
        match app_err {
            AppError::NotFound(msg) => assert_eq!(msg, "missing.avif"),
            _ => panic!("Expected NotFound variant"),
        }
    }

    #[test]
    fn test_from_storage_error_upload_failed() {
        let storage_err = StorageError::UploadFailed("disk full".to_string());
        let HttpAppError(app_err) = storage_err.into();
        match app_err {
            AppError::Storage(msg) => assert_eq!(msg, "disk full"),
            _ => panic!("Expected Storage variant"),
        }
    }

    #[test]
    fn test_from_storage_error_invalid_key() {
        let storage_err = StorageError::InvalidKey("Invalid key".to_string());
        let HttpAppError(app_err) = storage_err.into();
        match app_err {
            AppError::InvalidInput(msg) => assert_eq!(msg, "Invalid key"),
            _ => panic!("Expected InvalidInput variant"),
        }
    }

    #[test]
    fn test_from_storage_error_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let HttpAppError(app_err) = StorageError::IoError(io_err).into();
        match app_err {
            AppError::Storage(msg) => assert!(msg.contains("denied")),
            _ => panic!("Expected Storage variant"),
        }
    }

    #[test]
    fn test_from_transcode_error() {
        let HttpAppError(app_err) = TranscodeError::Decode("bad magic".to_string()).into();
        assert_eq!(app_err.http_status_code(), 500);
        assert_eq!(app_err.error_code(), "MEDIA_CONVERSION_ERROR");
    }

    #[test]
    fn test_error_response_hides_sensitive_details() {
        let err = AppError::Storage("/var/lib/pixdrop: permission denied".to_string());
        let body = ErrorResponse::from_app_error(&err, !err.is_sensitive());
        let json = serde_json::to_value(&body).expect("serialize");

        assert_eq!(json["code"], "STORAGE_ERROR");
        assert!(json.get("details").is_none());
        assert!(!json.to_string().contains("permission denied"));
    }

    #[test]
    fn test_error_response_shape() {
        let body = ErrorResponse::from_app_error(&AppError::NoFileUploaded, true);
        let json = serde_json::to_value(&body).expect("serialize");

        assert_eq!(json["error"], "No file uploaded.");
        assert_eq!(json["code"], "NO_FILE");
        assert_eq!(json["recoverable"], false);
        assert_eq!(json["error_type"], "NoFileUploaded");
        assert!(json["suggested_action"].is_string());
    }

    #[test]
    fn test_into_response_status() {
        let response = HttpAppError(AppError::NotFound("x.avif".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = HttpAppError(AppError::PayloadTooLarge("big".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn test_from_anyhow_is_internal() {
        let source = std::io::Error::other("task cancelled");
        let HttpAppError(app_err) = anyhow::Error::new(source)
            .context("Transcode task failed")
            .into();
        assert_eq!(app_err.http_status_code(), 500);
        assert_eq!(app_err.error_code(), "INTERNAL_ERROR");
        assert!(app_err.detailed_message().contains("task cancelled"));
    }

    #[test]
    fn test_into_response_attaches_details_only_when_not_sensitive() {
        let response =
            HttpAppError(AppError::InvalidInput("bad key".to_string())).into_response();
        let ErrorDetails(details) = response.extensions().get::<ErrorDetails>().unwrap();
        assert_eq!(details.error_type.as_deref(), Some("InvalidInput"));
        assert!(details.details.as_deref().unwrap().contains("bad key"));

        let response = HttpAppError(AppError::Storage("disk".to_string())).into_response();
        assert!(response.extensions().get::<ErrorDetails>().is_none());
    }

    #[tokio::test]
    async fn test_into_response_body_has_no_details() {
        let response =
            HttpAppError(AppError::InvalidInput("bad key".to_string())).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(json["code"], "INVALID_INPUT");
        assert!(json.get("details").is_none());
        assert!(json.get("error_type").is_none());
    }
}
