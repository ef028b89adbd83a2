//! OCR engine implementations
//!
//! Engines implement the `OcrEngine` trait. The only backend shells out to
//! the `tesseract` binary, which keeps the native dependency out of the
//! build.

pub mod tesseract;

use crate::config::Config;
use crate::engine::OcrEngine;

/// Create the configured OCR engine
pub fn from_config(config: &Config) -> Box<dyn OcrEngine> {
    let engine = tesseract::TesseractEngine::new(config);
    tracing::debug!(
        "Using {} engine: {} ({})",
        engine.name(),
        engine.description(),
        config.tesseract_cmd
    );
    Box::new(engine)
}
