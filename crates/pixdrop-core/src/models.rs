//! Response models

use serde::{Deserialize, Serialize};

use crate::constants::IMAGES_PATH;

/// Result of a successful upload: where the stored file lives and its final size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    /// Root-relative path the file can be fetched from
    pub src: String,
    pub width: u32,
    pub height: u32,
}

impl UploadResult {
    pub fn new(filename: &str, width: u32, height: u32) -> Self {
        Self {
            src: format!("{}/{}", IMAGES_PATH, filename),
            width,
            height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_result_shape() {
        let result = UploadResult::new("1700000000000-abc.avif", 1024, 768);
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["src"], "/images/1700000000000-abc.avif");
        assert_eq!(json["width"], 1024);
        assert_eq!(json["height"], 768);
        assert_eq!(json.as_object().unwrap().len(), 3);
    }
}
