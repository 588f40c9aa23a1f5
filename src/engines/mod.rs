//! OCR engine implementations
//!
//! One engine per recognition path. Engines are conditionally compiled based
//! on feature flags; a path whose engine is not compiled in simply recognizes
//! nothing.

#[cfg(feature = "engine-ocrs")]
pub mod ocrs;

#[cfg(feature = "engine-tesseract")]
pub mod tesseract;

use crate::config::Config;
use crate::engine::OcrEngine;
use crate::error::OcrError;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Information about an available engine
#[derive(Debug, Clone, serde::Serialize)]
pub struct EngineInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub supported_languages: Vec<String>,
}

impl EngineInfo {
    pub fn of(engine: &dyn OcrEngine) -> Self {
        Self {
            name: engine.name(),
            description: engine.description(),
            supported_languages: engine.supported_languages(),
        }
    }
}

/// Build the neural engine used on the raw photograph (path A)
#[allow(unused_variables)]
pub fn build_neural(config: &Config) -> Result<Option<Arc<dyn OcrEngine>>, OcrError> {
    #[cfg(feature = "engine-ocrs")]
    {
        let engine = ocrs::OcrsEngine::new()?;
        return Ok(Some(Arc::new(engine)));
    }

    #[cfg(not(feature = "engine-ocrs"))]
    {
        tracing::warn!("ocrs engine not compiled in (enable feature engine-ocrs)");
        Ok(None)
    }
}

/// Build the traditional engine used on the preprocessed image (path B)
#[allow(unused_variables)]
pub fn build_traditional(config: &Config) -> Result<Option<Arc<dyn OcrEngine>>, OcrError> {
    #[cfg(feature = "engine-tesseract")]
    {
        tracing::info!("Initializing tesseract engine...");
        let engine = tesseract::TesseractEngine::new(config)?;
        return Ok(Some(Arc::new(engine)));
    }

    #[cfg(not(feature = "engine-tesseract"))]
    {
        tracing::warn!("tesseract engine not compiled in (enable feature engine-tesseract)");
        Ok(None)
    }
}

/// Directory that caches downloaded models and tessdata
#[allow(dead_code)]
pub(crate) fn model_cache_dir() -> Result<PathBuf, OcrError> {
    let cache_dir = dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("label-ocr");

    std::fs::create_dir_all(&cache_dir).map_err(|e| {
        OcrError::InitializationError(format!("Failed to create cache directory: {}", e))
    })?;

    Ok(cache_dir)
}

/// Download a file from URL to path using ureq
#[allow(dead_code)]
pub(crate) fn download_file(url: &str, path: &Path) -> Result<(), OcrError> {
    let response = ureq::get(url)
        .call()
        .map_err(|e| OcrError::InitializationError(format!("Failed to download {}: {}", url, e)))?;

    let buffer = response.into_body().read_to_vec().map_err(|e| {
        OcrError::InitializationError(format!("Failed to read response body: {}", e))
    })?;

    // Write to a sibling temp file first so an interrupted download never
    // leaves a truncated model behind
    let partial = path.with_extension("part");
    let mut file = File::create(&partial).map_err(|e| {
        OcrError::InitializationError(format!("Failed to create {:?}: {}", partial, e))
    })?;
    file.write_all(&buffer).map_err(|e| {
        OcrError::InitializationError(format!("Failed to write {:?}: {}", partial, e))
    })?;
    std::fs::rename(&partial, path).map_err(|e| {
        OcrError::InitializationError(format!("Failed to move {:?} into place: {}", partial, e))
    })?;

    Ok(())
}
