use crate::error::HttpAppError;
use crate::state::AppState;
use crate::utils::upload::extract_image_field;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use pixdrop_core::{AppError, UploadResult};
use pixdrop_storage::generate_filename;
use std::sync::Arc;

/// Accept one image in the `image` multipart field, normalize it and store it.
///
/// Nothing is written to storage unless transcoding succeeds.
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_image"))]
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResult>, HttpAppError> {
    let multipart = multipart.map_err(|rejection| {
        tracing::debug!(reason = %rejection.body_text(), "Request is not multipart");
        AppError::NoFileUploaded
    })?;

    let data = extract_image_field(multipart, state.config.max_file_size_bytes()).await?;

    // Decode and AVIF encode are CPU-bound; keep them off the async workers
    let transcoder = state.transcoder;
    let transcoded = tokio::task::spawn_blocking(move || transcoder.transcode(&data))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Transcode task failed");
            anyhow::Error::new(e).context("Transcode task failed")
        })??;

    let filename = generate_filename(transcoded.format.extension());
    state
        .storage
        .put(&filename, transcoded.data.to_vec())
        .await?;

    tracing::info!(
        filename = %filename,
        width = transcoded.width,
        height = transcoded.height,
        "Image uploaded"
    );

    Ok(Json(UploadResult::new(
        &filename,
        transcoded.width,
        transcoded.height,
    )))
}
