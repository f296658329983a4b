//! Pixdrop Core Library
//!
//! Configuration, error types and response models shared by the Pixdrop crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{BaseConfig, Config, ImageConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::UploadResult;
