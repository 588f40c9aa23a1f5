use crate::error::OcrError;
use image::GrayImage;
use imageproc::filter::median_filter;

/// Neighbourhood radius of the median filter (1 => 3x3 window)
const MEDIAN_RADIUS: u32 = 1;

/// Median-blur the image to knock out sensor speckle before binarization
pub fn apply(image: GrayImage) -> Result<GrayImage, OcrError> {
    Ok(median_filter(&image, MEDIAN_RADIUS, MEDIAN_RADIUS))
}
