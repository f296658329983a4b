use image::{imageops::FilterType, DynamicImage, GenericImageView};

/// Image resize operations
pub struct ImageResize;

impl ImageResize {
    /// Largest size that fits inside `max_width` x `max_height` keeping the aspect ratio.
    ///
    /// Images already inside the box are returned unchanged (never upscaled); each
    /// side is at least 1 pixel.
    pub fn fit_inside(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
        if width == 0 || height == 0 || (width <= max_width && height <= max_height) {
            return (width, height);
        }

        let scale = (max_width as f64 / width as f64).min(max_height as f64 / height as f64);
        let new_width = ((width as f64 * scale).round() as u32).clamp(1, max_width.max(1));
        let new_height = ((height as f64 * scale).round() as u32).clamp(1, max_height.max(1));

        (new_width, new_height)
    }

    /// Downscale `img` to fit inside the bounding box, if it doesn't already
    pub fn apply_fit_inside(img: DynamicImage, max_width: u32, max_height: u32) -> DynamicImage {
        let (orig_width, orig_height) = img.dimensions();
        let (width, height) = Self::fit_inside(orig_width, orig_height, max_width, max_height);

        if (width, height) == (orig_width, orig_height) {
            return img;
        }

        tracing::debug!(
            from_width = orig_width,
            from_height = orig_height,
            to_width = width,
            to_height = height,
            "Resizing image to fit bounding box"
        );

        let filter = Self::select_filter(orig_width, orig_height, width, height);
        img.resize_exact(width, height, filter)
    }

    /// Select appropriate filter type based on resize ratio
    pub fn select_filter(
        orig_width: u32,
        orig_height: u32,
        new_width: u32,
        new_height: u32,
    ) -> FilterType {
        let width_ratio = orig_width as f32 / new_width.max(1) as f32;
        let height_ratio = orig_height as f32 / new_height.max(1) as f32;
        let max_ratio = width_ratio.max(height_ratio);

        // Heavy downscales gain little from wide kernels
        if max_ratio > 2.0 {
            FilterType::Triangle
        } else if max_ratio > 1.5 {
            FilterType::CatmullRom
        } else {
            FilterType::Lanczos3
        }
    }
}
