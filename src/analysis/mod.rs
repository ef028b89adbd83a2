//! Image statistics and automatic enhancement
//!
//! `analyze_image` measures an image, `determine_optimal_params` turns the
//! measurements into enhancement parameters, and the `auto_enhance_*`
//! helpers chain both with the enhancement pipeline.

pub mod heuristic;
pub mod metrics;

pub use heuristic::determine_optimal_params;
pub use metrics::{analyze_image, analyze_path, ImageMetrics};

use crate::error::Error;
use crate::files;
use crate::preprocessing::{EnhancementParams, Enhancer, StepTiming};
use image::DynamicImage;
use std::fs;
use std::path::{Path, PathBuf};

/// Outcome of automatic enhancement
#[derive(Debug, Clone)]
pub struct AutoEnhancement {
    pub metrics: ImageMetrics,
    pub params: EnhancementParams,
    pub image: DynamicImage,
}

/// Analyze an image, pick parameters and apply them
pub fn auto_enhance_image(image: &DynamicImage) -> Result<AutoEnhancement, Error> {
    let metrics = analyze_image(image);
    let params = determine_optimal_params(&metrics);
    let result = Enhancer::new(params).process(image)?;

    tracing::info!(
        "Auto enhancement applied [{}] in {}ms",
        describe(&params),
        result.total_time_ms
    );
    tracing::debug!("Step timings: {}", step_summary(&result.steps));

    Ok(AutoEnhancement {
        metrics,
        params,
        image: result.image,
    })
}

/// Load an image from disk and enhance it automatically
pub fn auto_enhance_path(path: &Path) -> Result<AutoEnhancement, Error> {
    let image = files::load_image(path)?;
    auto_enhance_image(&image)
}

/// Enhance every image and save it as `<stem>_enhanced.<ext>` in `output_dir`
pub fn batch_auto_enhance(paths: &[PathBuf], output_dir: &Path) -> Result<Vec<PathBuf>, Error> {
    fs::create_dir_all(output_dir)?;

    let mut outputs = Vec::with_capacity(paths.len());
    for (i, path) in paths.iter().enumerate() {
        tracing::info!("Processing image {} of {}: {}", i + 1, paths.len(), path.display());
        let enhanced = auto_enhance_path(path)?;
        let output = files::output_path(path, Some(output_dir), files::ENHANCED_SUFFIX);
        files::save_image(&enhanced.image, &output)?;
        outputs.push(output);
    }

    Ok(outputs)
}

fn step_summary(steps: &[StepTiming]) -> String {
    steps
        .iter()
        .map(|s| format!("{}={}ms", s.name, s.time_ms))
        .collect::<Vec<_>>()
        .join(", ")
}

fn describe(params: &EnhancementParams) -> String {
    let changes = params.describe_changes();
    if changes.is_empty() {
        "no changes".to_string()
    } else {
        changes.join(", ")
    }
}
