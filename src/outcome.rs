//! Explicit success / recovered-with-default results for pipeline stages.
//!
//! Every stage that is allowed to fail without aborting a scan returns an
//! [`Outcome`], so the substituted default and the error that caused it stay
//! visible to callers and tests.

use crate::error::OcrError;

#[derive(Debug)]
pub enum Outcome<T> {
    /// The stage produced its value normally
    Completed(T),
    /// The stage failed and `value` is the substituted default
    Recovered {
        value: T,
        stage: &'static str,
        error: OcrError,
    },
}

impl<T> Outcome<T> {
    /// Wrap a stage result, substituting `fallback()` on error.
    pub fn recover_with<F>(stage: &'static str, result: Result<T, OcrError>, fallback: F) -> Self
    where
        F: FnOnce() -> T,
    {
        match result {
            Ok(value) => Outcome::Completed(value),
            Err(error) => {
                tracing::warn!("{} failed, using fallback: {}", stage, error);
                Outcome::Recovered {
                    value: fallback(),
                    stage,
                    error,
                }
            }
        }
    }

    #[cfg(test)]
    pub fn value(&self) -> &T {
        match self {
            Outcome::Completed(value) | Outcome::Recovered { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Outcome::Completed(value) | Outcome::Recovered { value, .. } => value,
        }
    }

    #[cfg(test)]
    pub fn is_recovered(&self) -> bool {
        matches!(self, Outcome::Recovered { .. })
    }

    #[cfg(test)]
    pub fn error(&self) -> Option<&OcrError> {
        match self {
            Outcome::Completed(_) => None,
            Outcome::Recovered { error, .. } => Some(error),
        }
    }

    /// Stage name and error message when the stage fell back
    pub fn failure(&self) -> Option<StageFailure> {
        match self {
            Outcome::Completed(_) => None,
            Outcome::Recovered { stage, error, .. } => Some(StageFailure {
                stage,
                message: error.to_string(),
            }),
        }
    }
}

/// A recovered stage, as recorded on a finished scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageFailure {
    pub stage: &'static str,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_result_is_completed() {
        let outcome = Outcome::recover_with("ocr", Ok("text".to_string()), String::new);
        assert!(!outcome.is_recovered());
        assert!(outcome.error().is_none());
        assert_eq!(outcome.value(), "text");
    }

    #[test]
    fn test_err_result_keeps_provenance() {
        let outcome = Outcome::recover_with(
            "tesseract",
            Err(OcrError::ProcessingError("boom".to_string())),
            String::new,
        );
        assert!(outcome.is_recovered());
        let failure = outcome.failure().unwrap();
        assert_eq!(failure.stage, "tesseract");
        assert!(failure.message.contains("boom"));
        assert_eq!(outcome.into_value(), "");
    }
}
