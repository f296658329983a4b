use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use pixdrop_core::constants::UPLOAD_FIELD_NAME;
use pixdrop_core::AppError;

/// Extract the bytes of the single `image` field from a multipart form.
/// Other fields are ignored; a second `image` field is rejected.
pub async fn extract_image_field(
    mut multipart: Multipart,
    max_file_size: usize,
) -> Result<Vec<u8>, AppError> {
    let mut file_data: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_file_size))?
    {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        if field_name != UPLOAD_FIELD_NAME {
            tracing::debug!(field = %field_name, "Skipping unexpected multipart field");
            continue;
        }

        if file_data.is_some() {
            return Err(AppError::InvalidInput(format!(
                "Multiple image fields are not allowed; send exactly one field named '{}'",
                UPLOAD_FIELD_NAME
            )));
        }

        tracing::debug!(
            filename = ?field.file_name(),
            content_type = ?field.content_type(),
            "Reading uploaded image"
        );

        let data = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, max_file_size))?;

        file_data = Some(data.to_vec());
    }

    let file_data = file_data.ok_or(AppError::NoFileUploaded)?;

    if file_data.is_empty() {
        return Err(AppError::InvalidInput("File is empty".to_string()));
    }
    validate_file_size(file_data.len(), max_file_size)?;

    Ok(file_data)
}

/// Validate file size
pub fn validate_file_size(file_size: usize, max_size: usize) -> Result<(), AppError> {
    if file_size > max_size {
        return Err(too_large(max_size));
    }
    Ok(())
}

fn too_large(max_size: usize) -> AppError {
    AppError::PayloadTooLarge(format!(
        "File size exceeds maximum allowed size of {} MB",
        max_size / 1024 / 1024
    ))
}

fn multipart_error(err: MultipartError, max_file_size: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        too_large(max_file_size)
    } else {
        AppError::InvalidInput(format!("Failed to read multipart: {}", err.body_text()))
    }
}
