//! Shared constants and defaults

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_STORAGE_DIR: &str = "uploads";
pub const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000";

/// Upload body limit in megabytes
pub const MAX_FILE_SIZE_MB: usize = 10;

/// Side of the square bounding box uploads are fitted into
pub const DEFAULT_MAX_DIMENSION: u32 = 1024;
pub const DEFAULT_OUTPUT_FORMAT: &str = "avif";
pub const DEFAULT_QUALITY: &str = "normal";
pub const DEFAULT_AVIF_SPEED: u8 = 6;

/// Multipart field carrying the uploaded image
pub const UPLOAD_FIELD_NAME: &str = "image";

/// Public path prefix under which stored images are served
pub const IMAGES_PATH: &str = "/images";

/// Alternate public prefix kept for clients of the static-mount layout
pub const UPLOADS_PATH: &str = "/uploads";

pub const NO_FILE_UPLOADED: &str = "No file uploaded.";
pub const FILE_NOT_FOUND: &str = "File not found.";
