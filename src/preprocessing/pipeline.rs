use crate::config::Config;
use crate::error::OcrError;
use crate::outcome::{Outcome, StageFailure};
use image::{DynamicImage, GrayImage};
use std::path::Path;
use std::time::Instant;

use super::steps;

/// Tunables for the label preprocessing sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreprocessOptions {
    /// Run CLAHE contrast enhancement after grayscale conversion
    pub enhance_contrast: bool,
    /// Structuring element radius for close/open (0 = 1x1 element)
    pub morph_radius: u8,
    pub upscale_factor: u32,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self {
            enhance_contrast: false,
            morph_radius: 0,
            upscale_factor: steps::resize::UPSCALE_FACTOR,
        }
    }
}

impl From<&Config> for PreprocessOptions {
    fn from(config: &Config) -> Self {
        Self {
            enhance_contrast: config.enhance_contrast,
            ..Self::default()
        }
    }
}

/// Timing information for a single preprocessing step
#[derive(Debug, Clone)]
pub struct StepTiming {
    pub name: &'static str,
    pub time_ms: u64,
}

/// Result of preprocessing including timing stats
#[derive(Debug, Clone)]
pub struct PreprocessingResult {
    pub image: GrayImage,
    /// Total preprocessing time in milliseconds
    pub total_time_ms: u64,
    /// Individual step timings
    pub steps: Vec<StepTiming>,
    /// Steps that failed and were skipped without aborting the pipeline
    pub recovered: Vec<StageFailure>,
}

impl PreprocessingResult {
    fn fallback(image: GrayImage) -> Self {
        Self {
            image,
            total_time_ms: 0,
            steps: Vec::new(),
            recovered: Vec::new(),
        }
    }
}

/// Preprocessing pipeline: grayscale, [contrast], denoise, binarize,
/// close/open, deskew, upscale
pub struct Pipeline {
    options: PreprocessOptions,
}

impl Pipeline {
    pub fn new(options: PreprocessOptions) -> Self {
        Self { options }
    }

    /// Load and preprocess an image file.
    ///
    /// Never fails: if loading or any step errors, the file is re-read as
    /// plain grayscale; if even that fails the fallback is an empty image.
    pub fn process_file(&self, path: &Path) -> Outcome<PreprocessingResult> {
        let result = load_image(path).and_then(|img| self.process(img));

        Outcome::recover_with("preprocess", result, || {
            let image = load_grayscale(path).unwrap_or_else(|e| {
                tracing::warn!("Grayscale fallback failed for {}: {}", path.display(), e);
                GrayImage::new(0, 0)
            });
            PreprocessingResult::fallback(image)
        })
    }

    /// Run the fixed step sequence on an in-memory image
    pub fn process(&self, image: DynamicImage) -> Result<PreprocessingResult, OcrError> {
        let start = Instant::now();
        let mut timings = Vec::new();
        let mut recovered = Vec::new();

        let mut img = self.run_step("grayscale", &mut timings, || {
            steps::grayscale::apply(image)
        })?;

        if self.options.enhance_contrast {
            img = self.run_step("contrast", &mut timings, || steps::contrast::apply(img))?;
        }

        img = self.run_step("denoise", &mut timings, || steps::denoise::apply(img))?;
        img = self.run_step("threshold", &mut timings, || steps::threshold::apply(img))?;

        let radius = self.options.morph_radius;
        img = self.run_step("morphology", &mut timings, || {
            steps::morphology::apply(img, radius)
        })?;

        // Deskew recovers locally: a failure keeps the pre-deskew image
        let deskewed = Outcome::recover_with(
            "deskew",
            self.run_step("deskew", &mut timings, || steps::deskew::apply(&img)),
            || None,
        );
        recovered.extend(deskewed.failure());
        if let Some(rotated) = deskewed.into_value() {
            img = rotated;
        }

        let factor = self.options.upscale_factor;
        img = self.run_step("upscale", &mut timings, || steps::resize::apply(img, factor))?;

        let total_time_ms = start.elapsed().as_millis() as u64;
        for timing in &timings {
            tracing::debug!("preprocess step {}: {}ms", timing.name, timing.time_ms);
        }
        tracing::debug!(
            "Preprocessed to {}x{} in {}ms",
            img.width(),
            img.height(),
            total_time_ms
        );

        Ok(PreprocessingResult {
            image: img,
            total_time_ms,
            steps: timings,
            recovered,
        })
    }

    fn run_step<T, F>(
        &self,
        name: &'static str,
        timings: &mut Vec<StepTiming>,
        step_fn: F,
    ) -> Result<T, OcrError>
    where
        F: FnOnce() -> Result<T, OcrError>,
    {
        let step_start = Instant::now();
        let result = step_fn()?;
        timings.push(StepTiming {
            name,
            time_ms: step_start.elapsed().as_millis() as u64,
        });
        Ok(result)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(PreprocessOptions::default())
    }
}

/// Decode an image file
pub fn load_image(path: &Path) -> Result<DynamicImage, OcrError> {
    image::open(path).map_err(|e| OcrError::ImageLoad(format!("{}: {}", path.display(), e)))
}

/// Decode an image file straight to grayscale
pub fn load_grayscale(path: &Path) -> Result<GrayImage, OcrError> {
    load_image(path).map(|img| img.into_luma8())
}

/// Write a preprocessed image to disk, returning whether it succeeded
pub fn save_processed_image(image: &GrayImage, path: &Path) -> bool {
    match image.save(path) {
        Ok(()) => {
            tracing::info!("Saved preprocessed image to {}", path.display());
            true
        }
        Err(e) => {
            tracing::warn!("Failed to save preprocessed image to {}: {}", path.display(), e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb, RgbImage};
    use std::io::Write;

    fn label_like() -> RgbImage {
        // Light background with two dark text-like bars
        RgbImage::from_fn(120, 60, |x, y| {
            let ink = (10..110).contains(&x) && ((15..21).contains(&y) || (35..41).contains(&y));
            if ink {
                Rgb([20, 20, 30])
            } else {
                Rgb([235, 230, 220])
            }
        })
    }

    #[test]
    fn test_process_upscales_and_binarizes() {
        let result = Pipeline::default()
            .process(DynamicImage::ImageRgb8(label_like()))
            .unwrap();

        assert_eq!(result.image.dimensions(), (240, 120));
        assert!(result.recovered.is_empty());

        let names: Vec<&str> = result.steps.iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            vec!["grayscale", "denoise", "threshold", "morphology", "deskew", "upscale"]
        );

        // Ink stays dark and background stays light after cubic upscaling
        assert!(result.image.get_pixel(120, 36).0[0] < 64);
        assert!(result.image.get_pixel(120, 56).0[0] > 192);
    }

    #[test]
    fn test_contrast_step_is_optional() {
        let pipeline = Pipeline::new(PreprocessOptions {
            enhance_contrast: true,
            ..PreprocessOptions::default()
        });
        let result = pipeline
            .process(DynamicImage::ImageRgb8(label_like()))
            .unwrap();
        assert!(result.steps.iter().any(|s| s.name == "contrast"));
    }

    #[test]
    fn test_deskew_failure_stays_local() {
        // A blank label has no ink, so only the deskew step fails
        let blank = GrayImage::from_pixel(30, 20, Luma([255]));
        let result = Pipeline::default()
            .process(DynamicImage::ImageLuma8(blank))
            .unwrap();

        assert_eq!(result.recovered.len(), 1);
        assert_eq!(result.recovered[0].stage, "deskew");
        assert!(result.recovered[0].message.contains("no foreground pixels"));
        assert!(result.steps.iter().any(|s| s.name == "upscale"));
        assert_eq!(result.image.dimensions(), (60, 40));
    }

    #[test]
    fn test_process_file_reads_real_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("label.png");
        label_like().save(&path).unwrap();

        let outcome = Pipeline::default().process_file(&path);
        assert!(!outcome.is_recovered());
        assert_eq!(outcome.value().image.dimensions(), (240, 120));
    }

    #[test]
    fn test_corrupt_file_falls_back_without_panicking() {
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        file.write_all(b"definitely not a png").unwrap();

        let outcome = Pipeline::default().process_file(file.path());

        assert!(outcome.is_recovered());
        assert!(matches!(outcome.error(), Some(OcrError::ImageLoad(_))));
        assert_eq!(outcome.value().image.dimensions(), (0, 0));
    }

    #[test]
    fn test_missing_file_falls_back_without_panicking() {
        let outcome = Pipeline::default().process_file(Path::new("/nonexistent/label.jpg"));
        assert!(outcome.is_recovered());
        assert_eq!(outcome.into_value().image.dimensions(), (0, 0));
    }

    #[test]
    fn test_save_processed_image_reports_failure() {
        let img = GrayImage::from_pixel(4, 4, Luma([128]));
        assert!(!save_processed_image(&img, Path::new("/nonexistent/dir/out.png")));

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.png");
        assert!(save_processed_image(&img, &out));
        assert!(out.exists());
    }
}
