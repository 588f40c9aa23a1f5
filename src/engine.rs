use crate::error::OcrError;
use crate::preprocessing::pipeline::load_image;
use image::DynamicImage;
use std::path::Path;

/// Trait that both recognition paths implement
pub trait OcrEngine: Send + Sync {
    /// Returns the engine identifier (e.g., "ocrs", "tesseract")
    fn name(&self) -> &'static str;

    /// Returns a human-readable description of the engine
    fn description(&self) -> &'static str;

    /// Recognize text in an already decoded image
    fn recognize_image(&self, image: &DynamicImage) -> Result<String, OcrError>;

    /// Recognize text in an image file
    fn recognize_file(&self, path: &Path) -> Result<String, OcrError> {
        let image = load_image(path)?;
        self.recognize_image(&image)
    }

    /// Get supported languages
    fn supported_languages(&self) -> Vec<String>;
}
