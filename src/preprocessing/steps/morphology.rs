use crate::error::OcrError;
use image::GrayImage;
use imageproc::distance_transform::Norm;
use imageproc::morphology::{close, open};

/// Apply a morphological close followed by an open.
///
/// `radius` is the structuring element radius under the L-infinity norm;
/// radius 0 is the 1x1 element, which leaves character strokes untouched.
pub fn apply(image: GrayImage, radius: u8) -> Result<GrayImage, OcrError> {
    let closed = close(&image, Norm::LInf, radius);
    Ok(open(&closed, Norm::LInf, radius))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_minimal_element_preserves_binary_image() {
        let img = GrayImage::from_fn(20, 20, |x, y| {
            if (x + y) % 5 == 0 {
                Luma([0])
            } else {
                Luma([255])
            }
        });

        let result = apply(img.clone(), 0).unwrap();
        assert_eq!(result, img);
    }

    #[test]
    fn test_open_removes_white_speck_on_black() {
        // Foreground is the non-zero (white) region for imageproc morphology
        let mut img = GrayImage::from_pixel(15, 15, Luma([0]));
        img.put_pixel(7, 7, Luma([255]));

        let result = apply(img, 1).unwrap();
        assert_eq!(result.get_pixel(7, 7).0[0], 0);
    }
}
