use super::{blend, map_color_channels, to_8bit, to_gray};
use crate::error::Error;
use image::DynamicImage;

/// Scale contrast around the mean gray level of the image
pub fn apply(image: DynamicImage, factor: f32) -> Result<DynamicImage, Error> {
    let image = to_8bit(image);
    let mean = mean_gray_level(&image);
    Ok(map_color_channels(image, |v| blend(mean, v as f32, factor)))
}

/// Mean of the grayscale version of the image, rounded to an integer level
fn mean_gray_level(image: &DynamicImage) -> f32 {
    let gray = to_gray(image);
    let count = gray.width() as u64 * gray.height() as u64;
    if count == 0 {
        return 0.0;
    }
    let sum: u64 = gray.pixels().map(|p| p.0[0] as u64).sum();
    (sum as f64 / count as f64).round() as f32
}
