//! Image preprocessing for label photographs
//!
//! A fixed cleanup sequence that turns a camera shot into a high-contrast,
//! upright, enlarged grayscale image for the traditional recognition path.

pub mod pipeline;
pub mod steps;

pub use pipeline::{save_processed_image, Pipeline, PreprocessOptions, PreprocessingResult};
