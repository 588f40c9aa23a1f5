use crate::error::OcrError;
use image::{imageops, GrayImage, Luma};
use imageproc::contrast::{otsu_level, threshold, ThresholdType};
use imageproc::geometric_transformations::{warp_with, Interpolation};
use imageproc::geometry::{convex_hull, min_area_rect};
use imageproc::point::Point;

/// Rotations smaller than this (degrees) are not worth resampling for
const MIN_CORRECTION_DEG: f32 = 0.1;

/// Deskew image by rotating the text block back to horizontal
///
/// Returns `Ok(None)` when the image is already straight. Errors when the
/// image has no usable foreground; the pipeline treats that as a local
/// failure and keeps the un-rotated image.
pub fn apply(image: &GrayImage) -> Result<Option<GrayImage>, OcrError> {
    let angle = detect_skew_angle(image)?;

    if angle.abs() < MIN_CORRECTION_DEG {
        return Ok(None);
    }

    tracing::debug!("Correcting skew of {:.2} degrees", angle);
    Ok(Some(rotate_replicate(image, angle.to_radians())))
}

/// Skew of the ink block in degrees, normalized into [-45, 45).
///
/// Positive means the text descends to the right. Measured from the
/// minimum-area rectangle enclosing every dark pixel.
fn detect_skew_angle(img: &GrayImage) -> Result<f32, OcrError> {
    // Ink becomes foreground (255) so coordinates of dark pixels are collected
    let inverted = threshold(img, otsu_level(img), ThresholdType::BinaryInverted);

    let coords: Vec<Point<i32>> = inverted
        .enumerate_pixels()
        .filter(|(_, _, p)| p.0[0] > 0)
        .map(|(x, y, _)| Point::new(x as i32, y as i32))
        .collect();

    if coords.is_empty() {
        return Err(OcrError::PreprocessingError(
            "deskew: no foreground pixels".to_string(),
        ));
    }

    let hull = convex_hull(coords.as_slice());
    if hull.len() < 3 {
        // Degenerate ink (a dot or a straight line of pixels): nothing to rotate
        return Ok(0.0);
    }

    let rect = min_area_rect(hull.as_slice());
    let dx = (rect[1].x - rect[0].x) as f32;
    let dy = (rect[1].y - rect[0].y) as f32;

    Ok(normalize_angle(dy.atan2(dx).to_degrees()))
}

/// Fold an edge direction into [-45, 45)
fn normalize_angle(mut degrees: f32) -> f32 {
    while degrees >= 45.0 {
        degrees -= 90.0;
    }
    while degrees < -45.0 {
        degrees += 90.0;
    }
    degrees
}

/// Border added around the source before warping. The bicubic kernel reads a
/// 4x4 window and yields the default pixel once that window leaves the image.
const BICUBIC_MARGIN: u32 = 2;

/// Rotate about the image centre by `-skew` radians, replicating edge pixels
/// into the area uncovered by the rotation.
fn rotate_replicate(img: &GrayImage, skew: f32) -> GrayImage {
    let (width, height) = img.dimensions();
    let padded = pad_replicate(img, BICUBIC_MARGIN);

    let margin = BICUBIC_MARGIN as f32;
    let cx = margin + (width / 2) as f32;
    let cy = margin + (height / 2) as f32;
    // Source samples stay inside the original pixels; the margin feeds the kernel
    let (min_x, max_x) = (margin, margin + (width - 1) as f32);
    let (min_y, max_y) = (margin, margin + (height - 1) as f32);
    let (sin_a, cos_a) = skew.sin_cos();

    // Maps each output pixel to its pre-image in the skewed source
    let mapping = move |x: f32, y: f32| {
        let dx = x - cx;
        let dy = y - cy;
        let sx = cx + dx * cos_a - dy * sin_a;
        let sy = cy + dx * sin_a + dy * cos_a;
        (sx.clamp(min_x, max_x), sy.clamp(min_y, max_y))
    };

    let rotated = warp_with(&padded, mapping, Interpolation::Bicubic, Luma([255u8]));
    imageops::crop_imm(&rotated, BICUBIC_MARGIN, BICUBIC_MARGIN, width, height).to_image()
}

/// Copy of `img` with `margin` pixels of replicated edge on every side
fn pad_replicate(img: &GrayImage, margin: u32) -> GrayImage {
    let (width, height) = img.dimensions();
    GrayImage::from_fn(width + 2 * margin, height + 2 * margin, |x, y| {
        let sx = x.saturating_sub(margin).min(width - 1);
        let sy = y.saturating_sub(margin).min(height - 1);
        *img.get_pixel(sx, sy)
    })
}
