//! Transcoder settings from configuration

use anyhow::{Context, Result};
use pixdrop_core::Config;
use pixdrop_processing::{ImageTranscoder, OutputFormat, QualityPreset};

pub fn setup_transcoder(config: &Config) -> Result<ImageTranscoder> {
    let format = OutputFormat::parse(config.output_format()).context("Invalid OUTPUT_FORMAT")?;
    let quality = QualityPreset::parse(config.quality()).context("Invalid IMAGE_QUALITY")?;

    let transcoder = ImageTranscoder::new(config.max_dimension(), format, quality)
        .with_avif_speed(config.avif_speed());

    tracing::info!(
        format = ?transcoder.format,
        quality = ?transcoder.quality,
        max_width = transcoder.max_width,
        max_height = transcoder.max_height,
        avif_speed = transcoder.avif_speed,
        "Image transcoder configured"
    );

    Ok(transcoder)
}
