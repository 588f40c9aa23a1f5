//! Path A: the ocrs neural engine
//!
//! Reads the raw photograph with no preprocessing. The detection and
//! recognition models are fetched into the cache directory on first use.

use crate::engine::OcrEngine;
use crate::error::OcrError;
use image::DynamicImage;
use ocrs::{DecodeMethod, ImageSource, OcrEngine as OcrsOcrEngine, OcrEngineParams};
use rten::Model;

use super::{download_file, model_cache_dir};

const MODEL_BASE_URL: &str = "https://ocrs-models.s3-accelerate.amazonaws.com";
const DETECTION_MODEL: &str = "text-detection.rten";
const RECOGNITION_MODEL: &str = "text-recognition.rten";

pub struct OcrsEngine {
    engine: OcrsOcrEngine,
}

impl OcrsEngine {
    /// Load both models. This is the slow part of startup, so one engine is
    /// built per process and reused.
    pub fn new() -> Result<Self, OcrError> {
        tracing::info!("Initializing ocrs engine...");

        let engine = OcrsOcrEngine::new(OcrEngineParams {
            detection_model: Some(load_model(DETECTION_MODEL)?),
            recognition_model: Some(load_model(RECOGNITION_MODEL)?),
            decode_method: DecodeMethod::Greedy,
            ..Default::default()
        })
        .map_err(|e| OcrError::InitializationError(format!("ocrs: {}", e)))?;

        tracing::info!("ocrs engine ready");
        Ok(Self { engine })
    }
}

impl OcrEngine for OcrsEngine {
    fn name(&self) -> &'static str {
        "ocrs"
    }

    fn description(&self) -> &'static str {
        "Neural OCR engine (pure Rust) reading the raw photograph"
    }

    fn recognize_image(&self, image: &DynamicImage) -> Result<String, OcrError> {
        let rgb = image.to_rgb8();
        let source = ImageSource::from_bytes(rgb.as_raw(), rgb.dimensions())
            .map_err(|e| OcrError::ProcessingError(format!("ocrs input: {}", e)))?;

        let input = self
            .engine
            .prepare_input(source)
            .map_err(|e| OcrError::ProcessingError(format!("ocrs input: {}", e)))?;
        let words = self
            .engine
            .detect_words(&input)
            .map_err(|e| OcrError::ProcessingError(format!("ocrs detection: {}", e)))?;
        let lines = self.engine.find_text_lines(&input, &words);
        let recognized = self
            .engine
            .recognize_text(&input, &lines)
            .map_err(|e| OcrError::ProcessingError(format!("ocrs recognition: {}", e)))?;

        // One passage, lines in reading order separated by single spaces
        let mut passage = String::new();
        let mut line_count = 0;
        for line in recognized.iter().flatten() {
            let words: Vec<String> = line.words().map(|w| w.to_string()).collect();
            if words.is_empty() {
                continue;
            }
            if !passage.is_empty() {
                passage.push(' ');
            }
            passage.push_str(&words.join(" "));
            line_count += 1;
        }

        tracing::debug!("ocrs read {} lines", line_count);
        Ok(passage)
    }

    fn supported_languages(&self) -> Vec<String> {
        // Latin script only
        vec!["eng".to_string()]
    }
}

/// Load a model from the cache, downloading it first if absent
fn load_model(filename: &str) -> Result<Model, OcrError> {
    let path = model_cache_dir()?.join(filename);

    if path.exists() {
        tracing::debug!("Using cached model {:?}", path);
    } else {
        tracing::info!("Downloading {} (this may take a moment)...", filename);
        download_file(&format!("{}/{}", MODEL_BASE_URL, filename), &path)?;
    }

    Model::load_file(&path)
        .map_err(|e| OcrError::InitializationError(format!("Failed to load {}: {}", filename, e)))
}
