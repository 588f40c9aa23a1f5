//! The two recognition paths behind one reusable handle
//!
//! Building a [`Recognizer`] loads (and on first run downloads) the engine
//! models, so it is built once per process and shared by every scan.

use crate::config::Config;
use crate::engine::OcrEngine;
use crate::engines::{self, EngineInfo};
use crate::error::OcrError;
use crate::outcome::Outcome;
use crate::preprocessing::{Pipeline, PreprocessOptions, PreprocessingResult};
use image::{DynamicImage, GrayImage};
use std::path::Path;
use std::sync::Arc;

pub struct Recognizer {
    /// Path A: neural engine on the raw photograph
    neural: Option<Arc<dyn OcrEngine>>,
    /// Path B: traditional engine on the preprocessed image
    traditional: Option<Arc<dyn OcrEngine>>,
    pipeline: Pipeline,
}

impl Recognizer {
    /// Initialize every compiled-in engine from configuration
    pub fn new(config: &Config) -> Result<Self, OcrError> {
        let neural = engines::build_neural(config)?;
        let traditional = engines::build_traditional(config)?;

        if neural.is_none() && traditional.is_none() {
            return Err(OcrError::InitializationError(
                "No OCR engines available. Build with --features engine-ocrs or --features engine-tesseract".to_string()
            ));
        }

        Ok(Self::with_engines(
            neural,
            traditional,
            Pipeline::new(PreprocessOptions::from(config)),
        ))
    }

    /// Assemble a recognizer from already-built engines
    pub fn with_engines(
        neural: Option<Arc<dyn OcrEngine>>,
        traditional: Option<Arc<dyn OcrEngine>>,
        pipeline: Pipeline,
    ) -> Self {
        Self {
            neural,
            traditional,
            pipeline,
        }
    }

    /// Path A. Any failure yields empty text.
    pub fn read_neural(&self, path: &Path) -> Outcome<String> {
        let result = match &self.neural {
            Some(engine) => engine.recognize_file(path),
            None => Err(OcrError::EngineUnavailable("neural engine".to_string())),
        };
        Outcome::recover_with("neural_ocr", result, String::new)
    }

    /// Preprocess the image for path B
    pub fn preprocess(&self, path: &Path) -> Outcome<PreprocessingResult> {
        self.pipeline.process_file(path)
    }

    /// Path B on a preprocessed image. Any failure yields empty text.
    pub fn read_traditional(&self, image: &GrayImage) -> Outcome<String> {
        let result = match &self.traditional {
            Some(_) if image.width() == 0 || image.height() == 0 => Err(
                OcrError::ProcessingError("preprocessed image is empty".to_string()),
            ),
            Some(engine) => engine.recognize_image(&DynamicImage::ImageLuma8(image.clone())),
            None => Err(OcrError::EngineUnavailable("traditional engine".to_string())),
        };
        Outcome::recover_with("traditional_ocr", result, String::new)
    }

    pub fn engines(&self) -> Vec<EngineInfo> {
        self.neural
            .iter()
            .chain(self.traditional.iter())
            .map(|engine| EngineInfo::of(engine.as_ref()))
            .collect()
    }

    /// Release the engines and their models
    pub fn shutdown(self) {
        let names: Vec<&str> = self
            .neural
            .iter()
            .chain(self.traditional.iter())
            .map(|engine| engine.name())
            .collect();
        tracing::debug!("Shutting down recognizer ({})", names.join(", "));
        drop(self);
    }
}
