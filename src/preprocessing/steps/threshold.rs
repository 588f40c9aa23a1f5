use crate::error::OcrError;
use image::GrayImage;
use imageproc::contrast::{otsu_level, threshold, ThresholdType};

/// Binarize with a global Otsu threshold
/// Output contains only 0 (ink) and 255 (background)
pub fn apply(image: GrayImage) -> Result<GrayImage, OcrError> {
    let level = otsu_level(&image);
    tracing::debug!("Otsu threshold level: {}", level);
    Ok(threshold(&image, level, ThresholdType::Binary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_threshold_binarizes_image() {
        let img = GrayImage::from_fn(50, 50, |x, _| Luma([(x as u8 * 5).min(255)]));

        let result = apply(img).unwrap();

        for pixel in result.pixels() {
            assert!(
                pixel.0[0] == 0 || pixel.0[0] == 255,
                "Expected binary pixel, got {}",
                pixel.0[0]
            );
        }
    }

    #[test]
    fn test_threshold_separates_text_from_background() {
        let mut img = GrayImage::from_pixel(50, 20, Luma([230]));
        for x in 10..40 {
            for y in 8..12 {
                img.put_pixel(x, y, Luma([30]));
            }
        }

        let result = apply(img).unwrap();

        assert_eq!(result.get_pixel(25, 10).0[0], 0);
        assert_eq!(result.get_pixel(25, 2).0[0], 255);
    }
}
