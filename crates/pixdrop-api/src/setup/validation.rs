//! Configuration validation
//!
//! Validates configuration values at startup to catch misconfigurations early.

use anyhow::{anyhow, Result};
use axum::http::HeaderValue;
use pixdrop_core::Config;
use pixdrop_processing::{OutputFormat, QualityPreset};

/// Validate configuration values
///
/// Fails fast on values that would make the service misbehave at request time
/// instead of at startup.
pub fn validate_config(config: &Config) -> Result<()> {
    let is_production = config.is_production();

    // Validate CORS configuration
    let cors_origins = config.cors_origins();
    if cors_origins.is_empty() {
        tracing::warn!("No CORS origins configured - browsers on other origins cannot upload");
    }

    for origin in cors_origins {
        if origin == "*" {
            if is_production {
                return Err(anyhow!(
                    "CORS configured to allow all origins (*) in production - this is a security risk. \
                    Please set specific allowed origins via CORS_ORIGINS environment variable."
                ));
            }
            continue;
        }

        if !(origin.starts_with("http://") || origin.starts_with("https://")) {
            return Err(anyhow!(
                "CORS origin '{}' must start with http:// or https://",
                origin
            ));
        }
        HeaderValue::from_str(origin)
            .map_err(|_| anyhow!("CORS origin '{}' is not a valid header value", origin))?;
    }

    // Validate upload limits
    if config.max_file_size_bytes() == 0 {
        return Err(anyhow!("Max file size cannot be 0"));
    }

    if config.max_dimension() == 0 {
        return Err(anyhow!("Max image dimension cannot be 0"));
    }

    // Validate encoder settings
    OutputFormat::parse(config.output_format()).map_err(|_| {
        anyhow!(
            "Unsupported OUTPUT_FORMAT '{}' (expected avif, webp, jpeg or png)",
            config.output_format()
        )
    })?;

    QualityPreset::parse(config.quality()).map_err(|_| {
        anyhow!(
            "Unsupported IMAGE_QUALITY '{}' (expected normal, better, best, lighter or lightest)",
            config.quality()
        )
    })?;

    if !(1..=10).contains(&config.avif_speed()) {
        return Err(anyhow!(
            "AVIF_SPEED must be between 1 and 10, got {}",
            config.avif_speed()
        ));
    }

    tracing::info!("Configuration validation passed");
    Ok(())
}
