use crate::error::OcrError;
use image::{imageops, imageops::FilterType, GrayImage};

/// Upscale factor applied before recognition; small label print reads better enlarged
pub const UPSCALE_FACTOR: u32 = 2;

/// Enlarge the image by `factor` using cubic (Catmull-Rom) interpolation
pub fn apply(image: GrayImage, factor: u32) -> Result<GrayImage, OcrError> {
    let (width, height) = image.dimensions();

    let (new_width, new_height) = width
        .checked_mul(factor)
        .zip(height.checked_mul(factor))
        .ok_or_else(|| {
            OcrError::PreprocessingError(format!(
                "upscaling {}x{} by {} overflows",
                width, height, factor
            ))
        })?;

    if factor == 1 {
        return Ok(image);
    }

    Ok(imageops::resize(
        &image,
        new_width,
        new_height,
        FilterType::CatmullRom,
    ))
}
