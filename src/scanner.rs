//! One label scan end to end: recognize on both paths, reconcile, extract

use crate::config::Config;
use crate::error::OcrError;
use crate::extract::{self, StructuredInfo};
use crate::outcome::StageFailure;
use crate::preprocessing::save_processed_image;
use crate::reconcile::{self, Source};
use crate::recognizer::Recognizer;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// A finished scan
#[derive(Debug, Clone)]
pub struct Scan {
    /// Cleaned text of the winning path
    pub text: String,
    pub structured_info: StructuredInfo,
    pub neural_text: String,
    pub traditional_text: String,
    pub source: Source,
    /// Stages that failed and were replaced by a default
    pub recovered: Vec<StageFailure>,
}

/// The JSON document printed by the CLI and returned by `POST /scan`
#[derive(Debug, Serialize)]
pub struct ScanReport {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub text: String,
    pub structured_info: StructuredInfo,
}

impl ScanReport {
    pub fn success(text: String, structured_info: StructuredInfo) -> Self {
        Self {
            success: true,
            error: None,
            text,
            structured_info,
        }
    }

    pub fn failure(error: impl ToString) -> Self {
        Self {
            success: false,
            error: Some(error.to_string()),
            text: String::new(),
            structured_info: StructuredInfo::new(),
        }
    }
}

impl From<Result<Scan, OcrError>> for ScanReport {
    fn from(result: Result<Scan, OcrError>) -> Self {
        match result {
            Ok(scan) => ScanReport::success(scan.text, scan.structured_info),
            Err(e) => ScanReport::failure(e),
        }
    }
}

pub struct LabelScanner {
    recognizer: Recognizer,
    save_processed: Option<PathBuf>,
}

impl LabelScanner {
    pub fn new(recognizer: Recognizer, save_processed: Option<PathBuf>) -> Self {
        Self {
            recognizer,
            save_processed,
        }
    }

    /// Load the engines described by `config`
    pub fn from_config(config: &Config) -> Result<Self, OcrError> {
        let recognizer = Recognizer::new(config)?;
        Ok(Self::new(recognizer, config.save_processed.clone()))
    }

    pub fn recognizer(&self) -> &Recognizer {
        &self.recognizer
    }

    /// Scan one label image.
    ///
    /// Only a path that is not a readable file is an error; failures inside
    /// either recognition path degrade to empty text for that path.
    pub fn scan(&self, path: &Path) -> Result<Scan, OcrError> {
        if !path.is_file() {
            return Err(OcrError::ImageLoad(format!(
                "{} is not a file",
                path.display()
            )));
        }

        let start = Instant::now();
        let mut recovered = Vec::new();

        let neural = self.recognizer.read_neural(path);
        recovered.extend(neural.failure());

        let preprocessed = self.recognizer.preprocess(path);
        recovered.extend(preprocessed.failure());
        let preprocessed = preprocessed.into_value();
        recovered.extend(preprocessed.recovered.iter().cloned());

        tracing::debug!(
            "Preprocessing took {}ms over {} steps",
            preprocessed.total_time_ms,
            preprocessed.steps.len()
        );

        if let Some(out) = &self.save_processed {
            save_processed_image(&preprocessed.image, out);
        }

        let traditional = self.recognizer.read_traditional(&preprocessed.image);
        recovered.extend(traditional.failure());

        let neural_text = neural.into_value();
        let traditional_text = traditional.into_value();

        let source = reconcile::choose(&neural_text, &traditional_text);
        let text = reconcile::clean_text(reconcile::reconcile(&neural_text, &traditional_text));
        let structured_info = extract::extract(&text);

        let scan = Scan {
            text,
            structured_info,
            neural_text,
            traditional_text,
            source,
            recovered,
        };

        tracing::info!(
            "Scanned {} in {}ms: neural {} chars, traditional {} chars, using {:?}, {} field(s)",
            path.display(),
            start.elapsed().as_millis(),
            scan.neural_text.trim().chars().count(),
            scan.traditional_text.trim().chars().count(),
            scan.source,
            scan.structured_info.len()
        );
        for failure in &scan.recovered {
            tracing::debug!("Recovered stage {}: {}", failure.stage, failure.message);
        }

        Ok(scan)
    }

    pub fn shutdown(self) {
        self.recognizer.shutdown();
    }
}
