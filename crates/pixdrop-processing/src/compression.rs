use anyhow::{anyhow, Result};
use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::webp::WebPEncoder;
use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;

/// Default ravif speed (1 slowest/smallest, 10 fastest)
pub const DEFAULT_AVIF_SPEED: u8 = 6;

/// Quality presets for image compression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QualityPreset {
    #[default]
    Normal, // Default quality, balanced size and quality
    Better,   // Higher quality, ≈125% file size
    Best,     // Near pristine quality, ≈170% file size
    Lighter,  // Smaller files, ≈80% file size
    Lightest, // Maximum compression, ≈50% file size
}

impl QualityPreset {
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "normal" => Ok(QualityPreset::Normal),
            "better" => Ok(QualityPreset::Better),
            "best" => Ok(QualityPreset::Best),
            "lighter" => Ok(QualityPreset::Lighter),
            "lightest" => Ok(QualityPreset::Lightest),
            _ => Err(anyhow!("Invalid quality preset: {}", s)),
        }
    }

    /// Get quality value for JPEG (0-100)
    pub fn jpeg_quality(self) -> u8 {
        match self {
            QualityPreset::Normal => 75,
            QualityPreset::Better => 85,
            QualityPreset::Best => 95,
            QualityPreset::Lighter => 65,
            QualityPreset::Lightest => 50,
        }
    }

    /// Get quality value for AVIF (0-100)
    pub fn avif_quality(self) -> u8 {
        match self {
            QualityPreset::Normal => 70,
            QualityPreset::Better => 80,
            QualityPreset::Best => 90,
            QualityPreset::Lighter => 60,
            QualityPreset::Lightest => 45,
        }
    }
}

/// Output format for stored images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Avif,
    WebP,
    Jpeg,
    Png,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "avif" => Ok(OutputFormat::Avif),
            "webp" => Ok(OutputFormat::WebP),
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            "png" => Ok(OutputFormat::Png),
            _ => Err(anyhow!("Invalid format: {}", s)),
        }
    }

    /// File extension used for stored files, without the dot
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Avif => "avif",
            OutputFormat::WebP => "webp",
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
        }
    }
}

/// Main compression service
pub struct ImageCompressor;

impl ImageCompressor {
    /// Compress image with specified format and quality. `avif_speed` (1-10) only
    /// affects AVIF output.
    pub fn compress(
        img: &DynamicImage,
        format: OutputFormat,
        quality: QualityPreset,
        avif_speed: u8,
    ) -> Result<Bytes> {
        let start = std::time::Instant::now();

        let data = match format {
            OutputFormat::Avif => Self::compress_avif(img, quality, avif_speed)?,
            OutputFormat::WebP => Self::compress_webp(img)?,
            OutputFormat::Jpeg => Self::compress_jpeg(img, quality)?,
            OutputFormat::Png => Self::compress_png(img)?,
        };

        tracing::debug!(
            format = ?format,
            quality = ?quality,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Image encoded"
        );

        Ok(data)
    }

    /// Compress to JPEG. Alpha is dropped; JPEG has no transparency.
    fn compress_jpeg(img: &DynamicImage, quality: QualityPreset) -> Result<Bytes> {
        let rgb_img = img.to_rgb8();
        let mut buffer = Vec::new();

        let encoder = JpegEncoder::new_with_quality(&mut buffer, quality.jpeg_quality());
        rgb_img.write_with_encoder(encoder)?;

        Ok(Bytes::from(buffer))
    }

    /// Compress to PNG
    fn compress_png(img: &DynamicImage) -> Result<Bytes> {
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)?;
        Ok(Bytes::from(buffer))
    }

    /// Compress to WebP. The pure-Rust encoder is lossless only, so quality does not apply.
    fn compress_webp(img: &DynamicImage) -> Result<Bytes> {
        let rgba_img = img.to_rgba8();
        let mut buffer = Vec::new();

        rgba_img.write_with_encoder(WebPEncoder::new_lossless(&mut buffer))?;

        Ok(Bytes::from(buffer))
    }

    /// Compress to AVIF
    fn compress_avif(img: &DynamicImage, quality: QualityPreset, speed: u8) -> Result<Bytes> {
        let (width, height) = img.dimensions();

        let encoder = ravif::Encoder::new()
            .with_quality(quality.avif_quality() as f32)
            .with_speed(speed.clamp(1, 10));

        let encoded = if img.color().has_alpha() {
            let rgba_img = img.to_rgba8();
            let pixels: Vec<rgb::RGBA8> = rgba_img
                .as_raw()
                .chunks_exact(4)
                .map(|chunk| rgb::RGBA8::new(chunk[0], chunk[1], chunk[2], chunk[3]))
                .collect();
            let img_buf = ravif::Img::new(pixels.as_slice(), width as usize, height as usize);
            encoder.encode_rgba(img_buf)?
        } else {
            let rgb_img = img.to_rgb8();
            let pixels: Vec<rgb::RGB8> = rgb_img
                .as_raw()
                .chunks_exact(3)
                .map(|chunk| rgb::RGB8::new(chunk[0], chunk[1], chunk[2]))
                .collect();
            let img_buf = ravif::Img::new(pixels.as_slice(), width as usize, height as usize);
            encoder.encode_rgb(img_buf)?
        };

        Ok(Bytes::from(encoded.avif_file))
    }
}
