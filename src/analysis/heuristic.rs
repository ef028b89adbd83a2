use super::metrics::ImageMetrics;
use crate::preprocessing::EnhancementParams;

const DARK_BRIGHTNESS: f32 = 0.3;
const BRIGHT_BRIGHTNESS: f32 = 0.7;
const LOW_CONTRAST: f32 = 0.15;
const MEDIUM_CONTRAST: f32 = 0.25;
const VERY_BLURRY: f32 = 0.1;
const BLURRY: f32 = 0.2;
const FADED_COLOR: f32 = 0.1;
const NOISY: f32 = 0.3;

/// Pick enhancement parameters from image metrics.
///
/// Every rule is evaluated independently and adjustments compound: a dark,
/// flat image gets both a brightness and a contrast boost. Each boost grows
/// linearly with the distance from its threshold and is capped on its own.
pub fn determine_optimal_params(metrics: &ImageMetrics) -> EnhancementParams {
    let mut params = EnhancementParams::default();

    if metrics.brightness < DARK_BRIGHTNESS {
        params.brightness = (1.0 + (DARK_BRIGHTNESS - metrics.brightness) * 2.0).min(1.5);
    } else if metrics.brightness > BRIGHT_BRIGHTNESS {
        params.brightness = (1.0 - (metrics.brightness - BRIGHT_BRIGHTNESS) * 1.5).max(0.7);
    }

    if metrics.contrast < LOW_CONTRAST {
        params.contrast = (1.0 + (LOW_CONTRAST - metrics.contrast) * 5.0).min(1.8);
    } else if metrics.contrast < MEDIUM_CONTRAST {
        params.contrast = 1.1;
    }

    if metrics.sharpness < VERY_BLURRY {
        params.sharpness = (1.0 + (VERY_BLURRY - metrics.sharpness) * 10.0).min(2.0);
    } else if metrics.sharpness < BLURRY {
        params.sharpness = (1.0 + (BLURRY - metrics.sharpness) * 5.0).min(1.5);
    }

    // Faded documents
    if metrics.color_saturation < FADED_COLOR {
        params.color = (1.0 + (FADED_COLOR - metrics.color_saturation) * 3.0).min(1.5);
    }

    if metrics.noise_level > NOISY {
        params.denoise = true;
    }

    if metrics.might_be_skewed {
        params.deskew = true;
    }

    if looks_like_grayscale_document(metrics) {
        params.binarize = true;
        params.binarize_threshold = (120.0 + metrics.brightness * 50.0) as u8;
    }

    tracing::debug!(?params, "Selected enhancement parameters");
    params
}

/// Contrasty, unsaturated, gray-balanced and mid-bright: a black and white page
fn looks_like_grayscale_document(metrics: &ImageMetrics) -> bool {
    if metrics.contrast <= 0.2 || metrics.color_saturation >= 0.15 {
        return false;
    }

    let balanced = (metrics.r_avg - metrics.g_avg).abs() < 0.1
        && (metrics.r_avg - metrics.b_avg).abs() < 0.1
        && (metrics.g_avg - metrics.b_avg).abs() < 0.1;

    balanced && metrics.brightness > 0.4 && metrics.brightness < 0.7
}
