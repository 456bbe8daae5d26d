//! Image decoding for downloaded pages.

use dominant_color::{PixelBuffer, Rgb};

/// Decode raw image bytes into a flat RGB pixel buffer.
///
/// Returns `None` when the bytes are not a decodable color image:
/// corrupt downloads and monochrome pages are dropped silently (logged
/// at debug level only), they are not counted as page failures. The
/// alpha channel, when present, is discarded rather than blended.
pub fn decode_page(bytes: &[u8]) -> Option<PixelBuffer> {
    let img = match image::load_from_memory(bytes) {
        Ok(img) => img,
        Err(e) => {
            tracing::debug!(%e, "dropping undecodable page");
            return None;
        }
    };

    if !img.color().has_color() {
        tracing::debug!("dropping monochrome page");
        return None;
    }

    let rgb = img.to_rgb8();
    Some(rgb.pixels().map(|p| Rgb::new(p[0], p[1], p[2])).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GrayImage, RgbImage, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(img: DynamicImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_decode_color_image() {
        let img = RgbImage::from_pixel(4, 2, image::Rgb([200, 100, 50]));
        let pixels = decode_page(&png_bytes(DynamicImage::ImageRgb8(img))).unwrap();

        assert_eq!(pixels.len(), 8);
        assert!(pixels.iter().all(|&p| p == Rgb::new(200, 100, 50)));
    }

    #[test]
    fn test_alpha_is_discarded_not_blended() {
        // Half-transparent red: the RGB values must come through
        // unchanged, not darkened toward a background.
        let img = RgbaImage::from_pixel(2, 2, image::Rgba([200, 10, 10, 128]));
        let pixels = decode_page(&png_bytes(DynamicImage::ImageRgba8(img))).unwrap();

        assert!(pixels.iter().all(|&p| p == Rgb::new(200, 10, 10)));
    }

    #[test]
    fn test_monochrome_image_is_dropped() {
        let img = GrayImage::from_pixel(4, 4, image::Luma([128]));
        assert!(decode_page(&png_bytes(DynamicImage::ImageLuma8(img))).is_none());
    }

    #[test]
    fn test_garbage_bytes_are_dropped() {
        assert!(decode_page(b"not an image at all").is_none());
    }

    #[test]
    fn test_empty_bytes_are_dropped() {
        assert!(decode_page(&[]).is_none());
    }
}
