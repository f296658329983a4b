//! Storage abstraction trait
//!
//! This module defines the Storage trait that the image store is accessed through.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Stream of file chunks returned by [`Storage::download_stream`]
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send>>;

/// Storage abstraction trait
///
/// Keys are bare filenames inside a single flat directory; see the crate root
/// documentation. Stored files are immutable once `put` returns.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Store `data` under `filename` and return the stored filename.
    ///
    /// Either the complete file becomes visible under `filename` or nothing does.
    async fn put(&self, filename: &str, data: Vec<u8>) -> StorageResult<String>;

    /// Download a file as a stream of chunks
    async fn download_stream(&self, filename: &str) -> StorageResult<ByteStream>;

    /// Get the size in bytes of a stored file
    async fn content_length(&self, filename: &str) -> StorageResult<u64>;

    /// Filenames currently stored, in no particular order
    async fn list(&self) -> StorageResult<Vec<String>>;

    /// Verify the backing store is reachable
    async fn health_check(&self) -> StorageResult<()>;
}
