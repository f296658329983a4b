//! Image processing module
//!
//! - Decoding and dimension probing (processor)
//! - EXIF auto-orientation (orientation)
//! - Fit-inside downscaling (resize)

pub mod orientation;
pub mod processor;
pub mod resize;

pub use orientation::ImageOrientation;
pub use processor::ImageProcessor;
pub use resize::ImageResize;
