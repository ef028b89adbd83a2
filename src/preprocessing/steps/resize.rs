use crate::error::Error;
use image::{imageops::FilterType, DynamicImage};

/// Scale both dimensions by `factor` with Lanczos3 resampling
/// Dimensions are truncated and never drop below one pixel
pub fn apply(image: DynamicImage, factor: f32) -> Result<DynamicImage, Error> {
    if !factor.is_finite() || factor <= 0.0 {
        return Err(Error::InvalidArgument(format!(
            "resize factor must be positive, got {}",
            factor
        )));
    }

    let new_width = ((image.width() as f32 * factor) as u32).max(1);
    let new_height = ((image.height() as f32 * factor) as u32).max(1);

    if new_width == image.width() && new_height == image.height() {
        return Ok(image);
    }

    Ok(image.resize_exact(new_width, new_height, FilterType::Lanczos3))
}
