use super::{blend, map_color_channels};
use crate::error::Error;
use image::DynamicImage;

/// Scale brightness by blending with a black image
/// Factor 0.0 gives black, 1.0 the original, larger values brighten
pub fn apply(image: DynamicImage, factor: f32) -> Result<DynamicImage, Error> {
    Ok(map_color_channels(image, |v| blend(0.0, v as f32, factor)))
}
