use crate::error::OcrError;
use image::{DynamicImage, GrayImage};

/// Convert image to a single-channel grayscale buffer
/// Every later step works on the luma image produced here
pub fn apply(image: DynamicImage) -> Result<GrayImage, OcrError> {
    Ok(match image {
        DynamicImage::ImageLuma8(gray) => gray,
        other => other.into_luma8(),
    })
}
