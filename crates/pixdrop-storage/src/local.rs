use crate::keys::validate_key;
use crate::traits::{ByteStream, Storage, StorageError, StorageResult};
use async_trait::async_trait;
use futures::StreamExt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

const TEMP_SUFFIX: &str = ".tmp";

/// Local filesystem storage implementation
#[derive(Clone, Debug)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_canonical: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// The directory is created if absent, one level only: a missing parent is a
    /// configuration error rather than something to paper over.
    ///
    /// # Arguments
    /// * `base_path` - Directory holding the stored images (e.g., "uploads")
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        match fs::create_dir(&base_path).await {
            Ok(()) => {
                tracing::info!(path = %base_path.display(), "Created storage directory");
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {}
            Err(e) => {
                return Err(StorageError::ConfigError(format!(
                    "Failed to create storage directory {}: {}",
                    base_path.display(),
                    e
                )));
            }
        }

        let metadata = fs::metadata(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to stat storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;
        if !metadata.is_dir() {
            return Err(StorageError::ConfigError(format!(
                "Storage path {} is not a directory",
                base_path.display()
            )));
        }

        let base_canonical = fs::canonicalize(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!("Failed to canonicalize base path: {}", e))
        })?;

        Ok(LocalStorage {
            base_path,
            base_canonical,
        })
    }

    /// Directory the files are stored in
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Convert a filename to its filesystem path with security validation
    ///
    /// The filename must be a single plain path segment, and if it already exists
    /// its canonical form must stay inside the storage directory (symlinks).
    pub async fn resolve(&self, filename: &str) -> StorageResult<PathBuf> {
        validate_key(filename)?;

        let path = self.base_path.join(filename);

        if let Ok(canonical) = fs::canonicalize(&path).await {
            if canonical.strip_prefix(&self.base_canonical).is_err() {
                return Err(StorageError::InvalidKey(
                    "Storage key resolves outside storage directory".to_string(),
                ));
            }
        }

        Ok(path)
    }

    fn temp_path(&self, filename: &str) -> PathBuf {
        self.base_path
            .join(format!(".{}.{}{}", filename, Uuid::new_v4().simple(), TEMP_SUFFIX))
    }

    async fn write_temp(path: &Path, data: &[u8]) -> StorageResult<()> {
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await
            .map_err(|e| {
                StorageError::UploadFailed(format!(
                    "Failed to create file {}: {}",
                    path.display(),
                    e
                ))
            })?;

        file.write_all(data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        Ok(())
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn put(&self, filename: &str, data: Vec<u8>) -> StorageResult<String> {
        let path = self.resolve(filename).await?;
        let temp = self.temp_path(filename);
        let size = data.len();
        let start = std::time::Instant::now();

        // No-clobber publish: hard_link fails with AlreadyExists
        let written = match Self::write_temp(&temp, &data).await {
            Ok(()) => fs::hard_link(&temp, &path).await.map_err(|e| {
                if e.kind() == ErrorKind::AlreadyExists {
                    StorageError::UploadFailed(format!("File {} already exists", filename))
                } else {
                    StorageError::UploadFailed(format!(
                        "Failed to move file into place {}: {}",
                        path.display(),
                        e
                    ))
                }
            }),
            Err(e) => Err(e),
        };

        if let Err(cleanup) = fs::remove_file(&temp).await {
            if cleanup.kind() != ErrorKind::NotFound {
                tracing::warn!(
                    path = %temp.display(),
                    error = %cleanup,
                    "Failed to remove temporary file"
                );
            }
        }
        written?;

        tracing::info!(
            path = %path.display(),
            key = %filename,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(filename.to_string())
    }

    async fn download_stream(&self, filename: &str) -> StorageResult<ByteStream> {
        let path = self.resolve(filename).await?;
        let start = std::time::Instant::now();

        let file = match fs::File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::NotFound(filename.to_string()));
            }
            Err(e) => {
                return Err(StorageError::DownloadFailed(format!(
                    "Failed to open file {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        let key = filename.to_string();
        let path_display = path.display().to_string();
        let stream = tokio_util::io::ReaderStream::new(file).map(move |result| {
            result.map_err(|e| {
                tracing::error!(
                    path = %path_display,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    error = %e,
                    "Local storage stream download error"
                );
                StorageError::DownloadFailed(format!("Failed to read chunk: {}", e))
            })
        });

        Ok(Box::pin(stream))
    }

    async fn content_length(&self, filename: &str) -> StorageResult<u64> {
        let path = self.resolve(filename).await?;
        match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(meta.len()),
            Ok(_) => Err(StorageError::NotFound(filename.to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StorageError::NotFound(filename.to_string()))
            }
            Err(e) => Err(StorageError::BackendError(e.to_string())),
        }
    }

    async fn list(&self) -> StorageResult<Vec<String>> {
        let mut entries = fs::read_dir(&self.base_path).await?;
        let mut names = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if !name.starts_with('.') {
                    names.push(name.to_string());
                }
            }
        }

        Ok(names)
    }

    async fn health_check(&self) -> StorageResult<()> {
        let meta = fs::metadata(&self.base_path)
            .await
            .map_err(|e| StorageError::BackendError(e.to_string()))?;
        if !meta.is_dir() {
            return Err(StorageError::BackendError(format!(
                "{} is not a directory",
                self.base_path.display()
            )));
        }
        Ok(())
    }
}
