//! Storage key generation and validation.

use chrono::Utc;
use uuid::Uuid;

use crate::traits::{StorageError, StorageResult};

/// Longest filename accepted by common filesystems
const MAX_KEY_LEN: usize = 255;

/// Generate a unique filename for a newly stored artifact.
///
/// The millisecond timestamp keeps a directory listing in creation order; the
/// random token keeps two uploads finishing in the same millisecond apart.
pub fn generate_filename(extension: &str) -> String {
    format!(
        "{}-{}.{}",
        Utc::now().timestamp_millis(),
        Uuid::new_v4().simple(),
        extension.trim_start_matches('.')
    )
}

/// Validate a client-supplied key as a single, plain path segment.
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey("Storage key is empty".to_string()));
    }
    if key.len() > MAX_KEY_LEN {
        return Err(StorageError::InvalidKey("Storage key is too long".to_string()));
    }
    if key.contains("..")
        || key.contains('/')
        || key.contains('\\')
        || key.contains('\0')
        || key.starts_with('.')
    {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }
    Ok(())
}
