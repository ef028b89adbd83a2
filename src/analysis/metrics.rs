use crate::error::Error;
use crate::files;
use crate::preprocessing::steps::to_gray;
use image::{DynamicImage, GrayImage};
use imageproc::filter::filter3x3;
use serde::Serialize;
use std::path::Path;

/// Pixels ignored along each edge when estimating noise
const NOISE_BORDER: u32 = 5;
/// Images at or below this size in either dimension get the default noise level
const NOISE_MIN_DIMENSION: u32 = 10;
/// Noise level reported for images too small to measure
const DEFAULT_NOISE_LEVEL: f32 = 0.1;
/// Scale applied to the mean diagonal difference before capping at 1.0
const NOISE_SCALE: f32 = 5.0;

/// 3x3 edge detection kernel (center 8, neighbors -1)
const FIND_EDGES_KERNEL: [f32; 9] = [-1.0, -1.0, -1.0, -1.0, 8.0, -1.0, -1.0, -1.0, -1.0];

/// Normalized image statistics used to pick enhancement parameters.
/// All scalar measurements lie in the 0-1 range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ImageMetrics {
    /// Mean grayscale intensity
    pub brightness: f32,
    /// Standard deviation of grayscale intensity
    pub contrast: f32,
    /// Mean edge response, a proxy for high-frequency content
    pub sharpness: f32,
    /// Mean of the per-channel standard deviations
    pub color_saturation: f32,
    pub noise_level: f32,
    /// Always false: skew is not estimated
    pub might_be_skewed: bool,
    pub r_avg: f32,
    pub g_avg: f32,
    pub b_avg: f32,
}

/// Load an image from disk and analyze it
pub fn analyze_path(path: &Path) -> Result<ImageMetrics, Error> {
    let image = files::load_image(path)?;
    Ok(analyze_image(&image))
}

/// Compute metrics for an in-memory image
pub fn analyze_image(image: &DynamicImage) -> ImageMetrics {
    let gray = to_gray(image);
    let rgb = image.to_rgb8();

    let (gray_mean, gray_std) = channel_stats(gray.as_raw(), 1, 0);
    let (r_mean, r_std) = channel_stats(rgb.as_raw(), 3, 0);
    let (g_mean, g_std) = channel_stats(rgb.as_raw(), 3, 1);
    let (b_mean, b_std) = channel_stats(rgb.as_raw(), 3, 2);

    let edges = find_edges(&gray);
    let (edge_mean, _) = channel_stats(edges.as_raw(), 1, 0);

    let metrics = ImageMetrics {
        brightness: normalize(gray_mean),
        contrast: normalize(gray_std),
        sharpness: normalize(edge_mean),
        color_saturation: normalize((r_std + g_std + b_std) / 3.0),
        noise_level: estimate_noise(&gray),
        might_be_skewed: false,
        r_avg: normalize(r_mean),
        g_avg: normalize(g_mean),
        b_avg: normalize(b_mean),
    };

    tracing::debug!(?metrics, "Analyzed {}x{} image", image.width(), image.height());
    metrics
}

/// Edge response of a grayscale image. The outermost rows and columns
/// have no full neighborhood and keep their original intensities.
fn find_edges(gray: &GrayImage) -> GrayImage {
    let mut edges: GrayImage = filter3x3(gray, &FIND_EDGES_KERNEL);
    let (width, height) = gray.dimensions();
    for y in 0..height {
        for x in 0..width {
            if x == 0 || y == 0 || x + 1 == width || y + 1 == height {
                edges.put_pixel(x, y, *gray.get_pixel(x, y));
            }
        }
    }
    edges
}

/// Estimate noise from the mean absolute difference between each interior
/// pixel and its up-left neighbor. Very small images get a fixed default.
pub fn estimate_noise(gray: &GrayImage) -> f32 {
    let (width, height) = gray.dimensions();
    if width <= NOISE_MIN_DIMENSION || height <= NOISE_MIN_DIMENSION {
        return DEFAULT_NOISE_LEVEL;
    }

    let x_start = NOISE_BORDER;
    let y_start = NOISE_BORDER;
    let x_end = width - NOISE_BORDER;
    let y_end = height - NOISE_BORDER;

    // Need at least a 2x2 interior to form one diagonal pair
    if x_end - x_start < 2 || y_end - y_start < 2 {
        return DEFAULT_NOISE_LEVEL;
    }

    let mut total = 0u64;
    let mut count = 0u64;
    for y in (y_start + 1)..y_end {
        for x in (x_start + 1)..x_end {
            let current = gray.get_pixel(x, y).0[0] as i32;
            let diagonal = gray.get_pixel(x - 1, y - 1).0[0] as i32;
            total += (current - diagonal).unsigned_abs() as u64;
            count += 1;
        }
    }

    let mean_diff = total as f64 / count as f64 / 255.0;
    ((mean_diff as f32) * NOISE_SCALE).min(1.0)
}

/// Mean and population standard deviation of one channel of interleaved data
fn channel_stats(raw: &[u8], stride: usize, channel: usize) -> (f64, f64) {
    let mut sum = 0f64;
    let mut sum_sq = 0f64;
    let mut count = 0usize;

    for pixel in raw.chunks_exact(stride) {
        let value = pixel[channel] as f64;
        sum += value;
        sum_sq += value * value;
        count += 1;
    }

    if count == 0 {
        return (0.0, 0.0);
    }

    let mean = sum / count as f64;
    let variance = (sum_sq / count as f64 - mean * mean).max(0.0);
    (mean, variance.sqrt())
}

fn normalize(value: f64) -> f32 {
    (value / 255.0).clamp(0.0, 1.0) as f32
}
