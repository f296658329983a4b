use image::DynamicImage;
use std::io::Cursor;

/// Image orientation operations (rotation and flipping)
pub struct ImageOrientation;

impl ImageOrientation {
    /// Read the EXIF orientation tag from encoded image data.
    ///
    /// Returns the orientation value (1-8), or 1 (normal) when the image has no
    /// EXIF block, no orientation tag, or an out-of-range value.
    pub fn read_exif_orientation(data: &[u8]) -> u8 {
        let parsed = match exif::Reader::new().read_from_container(&mut Cursor::new(data)) {
            Ok(parsed) => parsed,
            Err(_) => return 1,
        };

        parsed
            .get_field(exif::Tag::Orientation, exif::In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .filter(|value| (1..=8).contains(value))
            .map(|value| value as u8)
            .unwrap_or(1)
    }

    /// Rotation and flip needed to display an image with the given EXIF orientation.
    ///
    /// Returns (rotate_angle_clockwise, flip_horizontal, flip_vertical); the
    /// rotation is applied before the flips.
    pub fn get_orientation_transforms(orientation: u8) -> (Option<u16>, bool, bool) {
        match orientation {
            1 => (None, false, false),      // Normal
            2 => (None, true, false),       // Mirror horizontal
            3 => (Some(180), false, false), // Rotate 180
            4 => (None, false, true),       // Mirror vertical
            5 => (Some(90), true, false),   // Transpose
            6 => (Some(90), false, false),  // Rotate 90 CW
            7 => (Some(270), true, false),  // Transverse
            8 => (Some(270), false, false), // Rotate 270 CW
            _ => (None, false, false),
        }
    }

    /// Apply EXIF orientation correction to an image decoded from `data`
    pub fn apply_exif_orientation(img: DynamicImage, data: &[u8]) -> DynamicImage {
        let orientation = Self::read_exif_orientation(data);
        Self::apply_orientation(img, orientation)
    }

    /// Apply the correction for a known EXIF orientation value
    pub fn apply_orientation(mut img: DynamicImage, orientation: u8) -> DynamicImage {
        let (rotate, flip_h, flip_v) = Self::get_orientation_transforms(orientation);

        if orientation != 1 {
            tracing::debug!(
                orientation = orientation,
                rotate = ?rotate,
                flip_horizontal = flip_h,
                flip_vertical = flip_v,
                "Applying EXIF orientation"
            );
        }

        if let Some(angle) = rotate {
            img = Self::rotate_by_angle(img, angle);
        }
        if flip_h {
            img = img.fliph();
        }
        if flip_v {
            img = img.flipv();
        }

        img
    }

    /// Rotate image by specified angle (90, 180, or 270 degrees clockwise)
    pub fn rotate_by_angle(img: DynamicImage, angle: u16) -> DynamicImage {
        match angle {
            90 => img.rotate90(),
            180 => img.rotate180(),
            270 => img.rotate270(),
            _ => img,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{GenericImageView, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};

    /// Encode a JPEG and splice in an EXIF APP1 segment carrying `orientation`.
    pub(crate) fn jpeg_with_orientation(width: u32, height: u32, orientation: u16) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([200, 40, 40]));
        let mut jpeg = Vec::new();
        img.write_to(&mut Cursor::new(&mut jpeg), ImageFormat::Jpeg)
            .unwrap();

        let mut app1 = vec![0xFF, 0xE1, 0x00, 0x22];
        app1.extend_from_slice(b"Exif\0\0");
        app1.extend_from_slice(b"MM\0\x2A\0\0\0\x08");
        app1.extend_from_slice(&[0x00, 0x01]);
        app1.extend_from_slice(&[0x01, 0x12, 0x00, 0x03, 0x00, 0x00, 0x00, 0x01]);
        app1.extend_from_slice(&orientation.to_be_bytes());
        app1.extend_from_slice(&[0x00, 0x00]);
        app1.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);

        let mut out = jpeg[..2].to_vec();
        out.extend_from_slice(&app1);
        out.extend_from_slice(&jpeg[2..]);
        out
    }

    /// 3x2 image with a distinct value in every pixel: value = 10 * (y * 3 + x + 1)
    fn marked_image() -> DynamicImage {
        let mut img = RgbaImage::new(3, 2);
        for (x, y, px) in img.enumerate_pixels_mut() {
            let v = (10 * (y * 3 + x + 1)) as u8;
            *px = Rgba([v, v, v, 255]);
        }
        DynamicImage::ImageRgba8(img)
    }

    fn marker(img: &DynamicImage, x: u32, y: u32) -> u8 {
        img.get_pixel(x, y)[0]
    }

    #[test]
    fn test_read_exif_orientation() {
        for orientation in 1..=8u16 {
            let data = jpeg_with_orientation(4, 2, orientation);
            assert_eq!(
                ImageOrientation::read_exif_orientation(&data),
                orientation as u8
            );
        }
    }

    #[test]
    fn test_read_exif_orientation_missing_or_invalid() {
        assert_eq!(ImageOrientation::read_exif_orientation(b""), 1);
        assert_eq!(ImageOrientation::read_exif_orientation(b"not an image"), 1);

        let mut png = Vec::new();
        RgbImage::new(2, 2)
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .unwrap();
        assert_eq!(ImageOrientation::read_exif_orientation(&png), 1);

        let data = jpeg_with_orientation(4, 2, 42);
        assert_eq!(ImageOrientation::read_exif_orientation(&data), 1);
    }

    #[test]
    fn test_rotation_dimension_changes() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 2, Rgba([0, 0, 255, 255])));

        assert_eq!(
            ImageOrientation::rotate_by_angle(img.clone(), 90).dimensions(),
            (2, 4)
        );
        assert_eq!(
            ImageOrientation::rotate_by_angle(img.clone(), 180).dimensions(),
            (4, 2)
        );
        assert_eq!(
            ImageOrientation::rotate_by_angle(img.clone(), 270).dimensions(),
            (2, 4)
        );
        assert_eq!(
            ImageOrientation::rotate_by_angle(img.clone(), 45).dimensions(),
            (4, 2)
        );
    }

    #[test]
    fn test_orientation_swaps_dimensions() {
        for orientation in 1..=8u8 {
            let oriented = ImageOrientation::apply_orientation(marked_image(), orientation);
            let expected = if orientation >= 5 { (2, 3) } else { (3, 2) };
            assert_eq!(oriented.dimensions(), expected, "orientation {}", orientation);
        }
    }

    #[test]
    fn test_orientation_pixel_mapping() {
        // Source layout:   10 20 30
        //                  40 50 60
        let img = marked_image();

        let o2 = ImageOrientation::apply_orientation(img.clone(), 2);
        assert_eq!(marker(&o2, 0, 0), 30);

        let o3 = ImageOrientation::apply_orientation(img.clone(), 3);
        assert_eq!(marker(&o3, 0, 0), 60);

        let o4 = ImageOrientation::apply_orientation(img.clone(), 4);
        assert_eq!(marker(&o4, 0, 0), 40);

        // Transpose: (x, y) -> (y, x)
        let o5 = ImageOrientation::apply_orientation(img.clone(), 5);
        assert_eq!(marker(&o5, 0, 0), 10);
        assert_eq!(marker(&o5, 1, 0), 40);
        assert_eq!(marker(&o5, 0, 2), 30);

        // Rotate 90 CW: bottom-left becomes top-left
        let o6 = ImageOrientation::apply_orientation(img.clone(), 6);
        assert_eq!(marker(&o6, 0, 0), 40);
        assert_eq!(marker(&o6, 1, 0), 10);

        // Transverse: top-left ends bottom-right
        let o7 = ImageOrientation::apply_orientation(img.clone(), 7);
        assert_eq!(marker(&o7, 0, 0), 60);
        assert_eq!(marker(&o7, 1, 2), 10);

        // Rotate 270 CW: top-right becomes top-left
        let o8 = ImageOrientation::apply_orientation(img.clone(), 8);
        assert_eq!(marker(&o8, 0, 0), 30);
        assert_eq!(marker(&o8, 0, 2), 10);
    }

    #[test]
    fn test_apply_exif_orientation_from_data() {
        let data = jpeg_with_orientation(8, 4, 6);
        let img = image::load_from_memory(&data).unwrap();
        assert_eq!(img.dimensions(), (8, 4));

        let oriented = ImageOrientation::apply_exif_orientation(img, &data);
        assert_eq!(oriented.dimensions(), (4, 8));
    }

    #[test]
    fn test_no_exif_keeps_image() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(10, 5, Rgba([255, 0, 0, 255])));
        let oriented = ImageOrientation::apply_exif_orientation(img.clone(), b"");
        assert_eq!(oriented.dimensions(), img.dimensions());
    }
}
