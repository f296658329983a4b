//! Configuration module
//!
//! Service configuration loaded from the environment (with `.env` support).
//! Every value has a default so the service starts with no configuration at all.

use std::env;
use std::path::{Path, PathBuf};

use crate::constants::{
    DEFAULT_AVIF_SPEED, DEFAULT_CORS_ORIGINS, DEFAULT_MAX_DIMENSION, DEFAULT_OUTPUT_FORMAT,
    DEFAULT_PORT, DEFAULT_QUALITY, DEFAULT_STORAGE_DIR, MAX_FILE_SIZE_MB,
};

/// Server-level settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
}

/// Upload, transcoding and storage settings
#[derive(Clone, Debug)]
pub struct ImageConfig {
    pub storage_dir: PathBuf,
    pub max_file_size_bytes: usize,
    pub max_dimension: u32,
    pub output_format: String,
    pub quality: String,
    pub avif_speed: u8,
}

/// Application configuration.
///
/// Built either from the environment with [`Config::from_env`] or explicitly with
/// [`Config::new`] and the `with_*` setters.
#[derive(Clone, Debug)]
pub struct Config {
    base: BaseConfig,
    image: ImageConfig,
}

impl Config {
    /// Configuration with all defaults, storing files under `storage_dir`.
    pub fn new(storage_dir: impl Into<PathBuf>) -> Self {
        Self {
            base: BaseConfig {
                server_port: DEFAULT_PORT,
                cors_origins: split_list(DEFAULT_CORS_ORIGINS),
                environment: "development".to_string(),
            },
            image: ImageConfig {
                storage_dir: storage_dir.into(),
                max_file_size_bytes: MAX_FILE_SIZE_MB * 1024 * 1024,
                max_dimension: DEFAULT_MAX_DIMENSION,
                output_format: DEFAULT_OUTPUT_FORMAT.to_string(),
                quality: DEFAULT_QUALITY.to_string(),
                avif_speed: DEFAULT_AVIF_SPEED,
            },
        }
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup (the environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let server_port = parse_number(&lookup, "PORT", DEFAULT_PORT)?;

        let cors_origins =
            split_list(&lookup("CORS_ORIGINS").unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string()));

        let max_file_size_mb = parse_number(&lookup, "MAX_FILE_SIZE_MB", MAX_FILE_SIZE_MB)?;
        let max_file_size_bytes = max_file_size_mb
            .checked_mul(1024 * 1024)
            .ok_or_else(|| {
                anyhow::anyhow!("MAX_FILE_SIZE_MB is too large, got {}", max_file_size_mb)
            })?;

        let max_dimension = parse_number(&lookup, "MAX_IMAGE_DIMENSION", DEFAULT_MAX_DIMENSION)?;
        let avif_speed = parse_number(&lookup, "AVIF_SPEED", DEFAULT_AVIF_SPEED)?;

        Ok(Self {
            base: BaseConfig {
                server_port,
                cors_origins,
                environment,
            },
            image: ImageConfig {
                storage_dir: lookup("STORAGE_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_DIR)),
                max_file_size_bytes,
                max_dimension,
                output_format: lookup("OUTPUT_FORMAT")
                    .map(|s| s.trim().to_lowercase())
                    .unwrap_or_else(|| DEFAULT_OUTPUT_FORMAT.to_string()),
                quality: lookup("IMAGE_QUALITY")
                    .map(|s| s.trim().to_lowercase())
                    .unwrap_or_else(|| DEFAULT_QUALITY.to_string()),
                avif_speed,
            },
        })
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.base.server_port = port;
        self
    }

    pub fn with_cors_origins<I, S>(mut self, origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.base.cors_origins = origins.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.base.environment = environment.into();
        self
    }

    pub fn with_max_file_size_bytes(mut self, bytes: usize) -> Self {
        self.image.max_file_size_bytes = bytes;
        self
    }

    pub fn with_max_dimension(mut self, max_dimension: u32) -> Self {
        self.image.max_dimension = max_dimension;
        self
    }

    pub fn with_output_format(mut self, format: impl Into<String>) -> Self {
        self.image.output_format = format.into();
        self
    }

    pub fn with_quality(mut self, quality: impl Into<String>) -> Self {
        self.image.quality = quality.into();
        self
    }

    pub fn with_avif_speed(mut self, speed: u8) -> Self {
        self.image.avif_speed = speed;
        self
    }

    // Convenience getters
    pub fn server_port(&self) -> u16 {
        self.base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.base.environment
    }

    pub fn storage_dir(&self) -> &Path {
        &self.image.storage_dir
    }

    pub fn max_file_size_bytes(&self) -> usize {
        self.image.max_file_size_bytes
    }

    pub fn max_dimension(&self) -> u32 {
        self.image.max_dimension
    }

    pub fn output_format(&self) -> &str {
        &self.image.output_format
    }

    pub fn quality(&self) -> &str {
        &self.image.quality
    }

    pub fn avif_speed(&self) -> u8 {
        self.image.avif_speed
    }
}

/// Parse an optional numeric setting; a present but unparsable value is an error.
fn parse_number<F, T>(lookup: &F, key: &str, default: T) -> Result<T, anyhow::Error>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| anyhow::anyhow!("{} must be a valid number, got '{}'", key, raw)),
        None => Ok(default),
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.server_port(), 3000);
        assert_eq!(config.storage_dir(), Path::new("uploads"));
        assert_eq!(config.cors_origins(), &["http://localhost:3000".to_string()]);
        assert_eq!(config.max_file_size_bytes(), 10 * 1024 * 1024);
        assert_eq!(config.max_dimension(), 1024);
        assert_eq!(config.output_format(), "avif");
        assert_eq!(config.quality(), "normal");
        assert!(!config.is_production());
    }

    #[test]
    fn test_values_read_from_lookup() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "8080"),
            ("STORAGE_DIR", "/var/lib/pixdrop"),
            ("CORS_ORIGINS", "http://localhost:3000, https://pixdrop.example.com"),
            ("MAX_FILE_SIZE_MB", "25"),
            ("OUTPUT_FORMAT", "WebP"),
            ("ENVIRONMENT", "Production"),
        ]))
        .unwrap();

        assert_eq!(config.server_port(), 8080);
        assert_eq!(config.storage_dir(), Path::new("/var/lib/pixdrop"));
        assert_eq!(
            config.cors_origins(),
            &[
                "http://localhost:3000".to_string(),
                "https://pixdrop.example.com".to_string()
            ]
        );
        assert_eq!(config.max_file_size_bytes(), 25 * 1024 * 1024);
        assert_eq!(config.output_format(), "webp");
        assert!(config.is_production());
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let result = Config::from_lookup(lookup_from(&[("PORT", "not-a-port")]));
        assert!(result.is_err());

        let result = Config::from_lookup(lookup_from(&[("PORT", "70000")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_numbers_are_rejected() {
        for (key, value) in [
            ("MAX_FILE_SIZE_MB", "ten"),
            ("MAX_FILE_SIZE_MB", "-1"),
            ("MAX_IMAGE_DIMENSION", "big"),
            ("AVIF_SPEED", "fast"),
            ("AVIF_SPEED", "300"),
        ] {
            let result = Config::from_lookup(lookup_from(&[(key, value)]));
            let err = result.expect_err(key).to_string();
            assert!(err.contains(key), "{}", err);
        }
    }

    #[test]
    fn test_file_size_overflow_is_rejected() {
        let result = Config::from_lookup(lookup_from(&[(
            "MAX_FILE_SIZE_MB",
            "18446744073709551615",
        )]));
        let err = result.unwrap_err().to_string();
        assert!(err.contains("too large"));
    }

    #[test]
    fn test_numeric_values_read_from_lookup() {
        let config = Config::from_lookup(lookup_from(&[
            ("MAX_IMAGE_DIMENSION", " 2048 "),
            ("AVIF_SPEED", "9"),
        ]))
        .unwrap();
        assert_eq!(config.max_dimension(), 2048);
        assert_eq!(config.avif_speed(), 9);
    }

    #[test]
    fn test_app_env_fallback() {
        let config = Config::from_lookup(lookup_from(&[("APP_ENV", "prod")])).unwrap();
        assert!(config.is_production());
    }

    #[test]
    fn test_builder_setters() {
        let config = Config::new("/tmp/store")
            .with_port(0)
            .with_cors_origins(["https://a.example"])
            .with_max_dimension(64)
            .with_output_format("png");

        assert_eq!(config.server_port(), 0);
        assert_eq!(config.cors_origins(), &["https://a.example".to_string()]);
        assert_eq!(config.max_dimension(), 64);
        assert_eq!(config.output_format(), "png");
        assert_eq!(config.storage_dir(), Path::new("/tmp/store"));
    }
}
