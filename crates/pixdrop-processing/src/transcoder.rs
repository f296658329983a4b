//! Upload transcoding pipeline: decode, orient, fit, encode, probe.

use bytes::Bytes;
use image::GenericImageView;

use crate::compression::{ImageCompressor, OutputFormat, QualityPreset, DEFAULT_AVIF_SPEED};
use crate::error::TranscodeError;
use crate::image::{ImageOrientation, ImageProcessor, ImageResize};

/// Encoded image ready to be stored
#[derive(Debug, Clone)]
pub struct TranscodedImage {
    pub data: Bytes,
    /// Width read back from `data`
    pub width: u32,
    /// Height read back from `data`
    pub height: u32,
    pub format: OutputFormat,
}

/// Normalizes uploads into the stored representation.
///
/// Each call is independent; the transcoder holds only settings and can be shared
/// across threads freely.
#[derive(Debug, Clone, Copy)]
pub struct ImageTranscoder {
    pub max_width: u32,
    pub max_height: u32,
    pub format: OutputFormat,
    pub quality: QualityPreset,
    pub avif_speed: u8,
}

impl Default for ImageTranscoder {
    fn default() -> Self {
        Self::new(1024, OutputFormat::Avif, QualityPreset::Normal)
    }
}

impl ImageTranscoder {
    /// Transcoder fitting images inside a `max_dimension` square box
    pub fn new(max_dimension: u32, format: OutputFormat, quality: QualityPreset) -> Self {
        Self {
            max_width: max_dimension,
            max_height: max_dimension,
            format,
            quality,
            avif_speed: DEFAULT_AVIF_SPEED,
        }
    }

    pub fn with_avif_speed(mut self, speed: u8) -> Self {
        self.avif_speed = speed;
        self
    }

    /// Turn raw upload bytes into the stored image.
    ///
    /// The result carries no EXIF metadata: orientation is baked into the pixels
    /// and the encoders write none. Width and height come from the encoded output.
    pub fn transcode(&self, data: &[u8]) -> Result<TranscodedImage, TranscodeError> {
        let start = std::time::Instant::now();

        let img = ImageProcessor::decode(data)
            .map_err(|e| TranscodeError::Decode(format!("{:#}", e)))?;
        let (source_width, source_height) = img.dimensions();

        let img = ImageOrientation::apply_exif_orientation(img, data);
        let img = ImageResize::apply_fit_inside(img, self.max_width, self.max_height);

        let encoded = ImageCompressor::compress(&img, self.format, self.quality, self.avif_speed)
            .map_err(|e| TranscodeError::Encode(format!("{:#}", e)))?;

        let (width, height) = ImageProcessor::read_dimensions(&encoded)
            .map_err(|e| TranscodeError::Probe(format!("{:#}", e)))?;

        tracing::info!(
            source_width = source_width,
            source_height = source_height,
            source_bytes = data.len(),
            width = width,
            height = height,
            format = ?self.format,
            size_bytes = encoded.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Image transcoded"
        );

        Ok(TranscodedImage {
            data: encoded,
            width,
            height,
            format: self.format,
        })
    }
}
