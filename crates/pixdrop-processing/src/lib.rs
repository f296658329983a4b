//! Pixdrop Processing Library
//!
//! Turns an uploaded image into the stored artifact: decode, auto-orient from
//! EXIF, fit inside the configured bounding box, and re-encode to a single
//! output format. Everything here is synchronous and CPU-bound; callers on an
//! async runtime should run [`ImageTranscoder::transcode`] on a blocking thread.

pub mod compression;
pub mod error;
pub mod image;
pub mod transcoder;

// Re-export commonly used types
pub use compression::{ImageCompressor, OutputFormat, QualityPreset};
pub use error::TranscodeError;
pub use self::image::{ImageOrientation, ImageProcessor, ImageResize};
pub use transcoder::{ImageTranscoder, TranscodedImage};
