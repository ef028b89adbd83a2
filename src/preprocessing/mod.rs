//! Image enhancement for OCR
//!
//! Parameter sets, named presets and the fixed-order enhancement pipeline.

pub mod params;
pub mod pipeline;
pub mod presets;
pub mod steps;

pub use params::EnhancementParams;
pub use pipeline::{EnhancementResult, Enhancer, StepTiming};
pub use presets::Preset;
