use crate::error::Error;
use image::DynamicImage;
use std::time::Instant;

use super::params::EnhancementParams;
use super::steps;

/// Timing information for a single enhancement step
#[derive(Debug, Clone)]
pub struct StepTiming {
    pub name: String,
    pub time_ms: u64,
}

/// Result of an enhancement run including timing stats
#[derive(Debug, Clone)]
pub struct EnhancementResult {
    pub image: DynamicImage,
    /// Total enhancement time in milliseconds
    pub total_time_ms: u64,
    /// Individual step timings, in execution order
    pub steps: Vec<StepTiming>,
}

/// Applies a set of enhancement parameters to images.
///
/// Steps always run in the same order: resize, brightness, contrast,
/// color, sharpness, denoise, deskew, binarize. A step whose parameter
/// is neutral is skipped. The input image is never modified.
#[derive(Debug, Clone, Default)]
pub struct Enhancer {
    params: EnhancementParams,
}

impl Enhancer {
    pub fn new(params: EnhancementParams) -> Self {
        Self { params }
    }

    /// Enhance an image, returning only the new image
    pub fn enhance(&self, image: &DynamicImage) -> Result<DynamicImage, Error> {
        Ok(self.process(image)?.image)
    }

    /// Enhance an image and report which steps ran and how long they took
    pub fn process(&self, image: &DynamicImage) -> Result<EnhancementResult, Error> {
        let start = Instant::now();
        let mut steps_timing = Vec::new();
        let params = self.params;

        let mut img = image.clone();

        if params.is_neutral() {
            return Ok(EnhancementResult {
                image: img,
                total_time_ms: 0,
                steps: steps_timing,
            });
        }

        if let Some(factor) = params.resize() {
            img = self.run_step("resize", img, &mut steps_timing, |i| {
                steps::resize::apply(i, factor)
            })?;
        }

        if params.brightness != 1.0 {
            img = self.run_step("brightness", img, &mut steps_timing, |i| {
                steps::brightness::apply(i, params.brightness)
            })?;
        }

        if params.contrast != 1.0 {
            img = self.run_step("contrast", img, &mut steps_timing, |i| {
                steps::contrast::apply(i, params.contrast)
            })?;
        }

        if params.color != 1.0 {
            img = self.run_step("color", img, &mut steps_timing, |i| {
                steps::color::apply(i, params.color)
            })?;
        }

        if params.sharpness != 1.0 {
            img = self.run_step("sharpness", img, &mut steps_timing, |i| {
                steps::sharpen::apply(i, params.sharpness)
            })?;
        }

        if params.denoise {
            img = self.run_step("denoise", img, &mut steps_timing, steps::denoise::apply)?;
        }

        if params.deskew {
            img = self.run_step("deskew", img, &mut steps_timing, steps::deskew::apply)?;
        }

        // Binarization is always last
        if params.binarize {
            img = self.run_step("binarize", img, &mut steps_timing, |i| {
                steps::threshold::apply(i, params.binarize_threshold)
            })?;
        }

        Ok(EnhancementResult {
            image: img,
            total_time_ms: start.elapsed().as_millis() as u64,
            steps: steps_timing,
        })
    }

    /// Enhance an image and shrink the result to fit within `max_width` x `max_height`
    pub fn preview(
        &self,
        image: &DynamicImage,
        max_width: u32,
        max_height: u32,
    ) -> Result<DynamicImage, Error> {
        let enhanced = self.enhance(image)?;
        Ok(crate::preview::fit_within(&enhanced, max_width, max_height))
    }

    fn run_step<F>(
        &self,
        name: &str,
        img: DynamicImage,
        timings: &mut Vec<StepTiming>,
        step_fn: F,
    ) -> Result<DynamicImage, Error>
    where
        F: FnOnce(DynamicImage) -> Result<DynamicImage, Error>,
    {
        let step_start = Instant::now();
        let result = step_fn(img)?;
        let time_ms = step_start.elapsed().as_millis() as u64;
        tracing::debug!("Enhancement step '{}' took {}ms", name, time_ms);
        timings.push(StepTiming {
            name: name.to_string(),
            time_ms,
        });
        Ok(result)
    }
}
