//! Tesseract engine implementation
//!
//! The traditional recognition path. It reads the preprocessed (binarized,
//! deskewed, upscaled) image with a page segmentation mode suited to a
//! single uniform block of label text. Uses tesseract-static for static
//! linking and downloads tessdata on first use.

use crate::config::Config;
use crate::engine::OcrEngine;
use crate::error::OcrError;
use image::DynamicImage;
use std::path::Path;
use tesseract_static::tesseract::Tesseract;

use super::{download_file, model_cache_dir};

/// Tesseract OCR Engine
pub struct TesseractEngine {
    /// Path to tessdata directory
    tessdata_path: String,
    /// Language (or `+`-joined languages) for recognition
    language: String,
    /// Page segmentation mode, 6 = assume a single uniform block of text
    page_seg_mode: u8,
}

impl TesseractEngine {
    /// Create a new Tesseract-based OCR engine
    pub fn new(config: &Config) -> Result<Self, OcrError> {
        let language = config.tesseract_language.clone();

        let tessdata_path = match &config.tessdata_path {
            Some(path) => path.clone(),
            None => ensure_tessdata_available(&language)?,
        };

        // Validate that tessdata is accessible by doing a test initialization
        let test_tess = Tesseract::new(Some(&tessdata_path), Some(&language)).map_err(|e| {
            OcrError::InitializationError(format!("Failed to initialize Tesseract: {}", e))
        })?;
        drop(test_tess);

        tracing::info!(
            "Tesseract engine initialized (tessdata: {}, language: {}, psm: {})",
            tessdata_path,
            language,
            config.page_seg_mode
        );

        Ok(Self {
            tessdata_path,
            language,
            page_seg_mode: config.page_seg_mode,
        })
    }
}

impl OcrEngine for TesseractEngine {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    fn description(&self) -> &'static str {
        "Tesseract OCR engine - reads the preprocessed label image as one text block"
    }

    fn recognize_image(&self, image: &DynamicImage) -> Result<String, OcrError> {
        let rgb_img = image.to_rgb8();
        let (width, height) = rgb_img.dimensions();

        // BMP is always supported by leptonica
        let mut bmp_data = Vec::new();
        rgb_img
            .write_to(&mut std::io::Cursor::new(&mut bmp_data), image::ImageFormat::Bmp)
            .map_err(|e| OcrError::ProcessingError(format!("Failed to convert to BMP: {}", e)))?;

        tracing::debug!(
            "Tesseract input: {}x{}, BMP size: {} bytes",
            width,
            height,
            bmp_data.len()
        );

        let mut tess = Tesseract::new(Some(&self.tessdata_path), Some(&self.language))
            .map_err(|e| OcrError::ProcessingError(format!("Failed to create Tesseract: {}", e)))?
            .set_variable("tessedit_pageseg_mode", &self.page_seg_mode.to_string())
            .map_err(|e| {
                OcrError::ProcessingError(format!("Failed to set page segmentation mode: {}", e))
            })?;

        tess = tess.set_image_from_mem(&bmp_data).map_err(|e| {
            OcrError::ProcessingError(format!(
                "Failed to set image ({}x{}, {} bytes): {}",
                width,
                height,
                bmp_data.len(),
                e
            ))
        })?;

        tess = tess
            .recognize()
            .map_err(|e| OcrError::ProcessingError(format!("Failed to recognize text: {}", e)))?;

        tess.get_text()
            .map_err(|e| OcrError::ProcessingError(format!("Failed to get text: {}", e)))
    }

    fn supported_languages(&self) -> Vec<String> {
        self.language.split('+').map(str::to_string).collect()
    }
}

/// Ensure tessdata for every `+`-joined language is cached, downloading if needed
fn ensure_tessdata_available(language: &str) -> Result<String, OcrError> {
    let cache_dir = model_cache_dir()?.join("tessdata");

    std::fs::create_dir_all(&cache_dir).map_err(|e| {
        OcrError::InitializationError(format!("Failed to create tessdata directory: {}", e))
    })?;

    for lang in language.split('+').filter(|l| !l.is_empty()) {
        let traineddata_path = cache_dir.join(format!("{}.traineddata", lang));

        if !traineddata_path.exists() {
            tracing::info!(
                "Downloading tessdata for '{}' (this may take a moment)...",
                lang
            );
            download_file(&tessdata_url(lang), &traineddata_path)?;
            tracing::info!("Downloaded tessdata to {:?}", traineddata_path);
        } else {
            tracing::info!("Using cached tessdata from {:?}", traineddata_path);
        }
    }

    // Tesseract expects the directory, not the file
    path_to_string(&cache_dir)
}

/// Get tessdata download URL for a language
fn tessdata_url(language: &str) -> String {
    // Use tessdata_fast for smaller, faster downloads
    format!(
        "https://github.com/tesseract-ocr/tessdata_fast/raw/main/{}.traineddata",
        language
    )
}

fn path_to_string(path: &Path) -> Result<String, OcrError> {
    path.to_str()
        .map(|s| s.to_string())
        .ok_or_else(|| OcrError::InitializationError("Invalid tessdata path".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tessdata_url_uses_fast_models() {
        assert_eq!(
            tessdata_url("hin"),
            "https://github.com/tesseract-ocr/tessdata_fast/raw/main/hin.traineddata"
        );
    }
}
