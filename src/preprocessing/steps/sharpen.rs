use super::{blend, layout, to_8bit};
use crate::error::Error;
use image::{DynamicImage, GrayAlphaImage, GrayImage, RgbImage, RgbaImage};
use imageproc::filter::filter3x3;

/// Smoothing kernel used as the "blurred" reference for sharpening
/// Center weight 5, neighbors 1 each, normalized by 13
const SMOOTH_KERNEL: [f32; 9] = [
    1.0 / 13.0,
    1.0 / 13.0,
    1.0 / 13.0,
    1.0 / 13.0,
    5.0 / 13.0,
    1.0 / 13.0,
    1.0 / 13.0,
    1.0 / 13.0,
    1.0 / 13.0,
];

/// Adjust sharpness by blending with a smoothed copy
/// Factor 0.0 gives the smoothed image, above 1.0 sharpens
pub fn apply(image: DynamicImage, factor: f32) -> Result<DynamicImage, Error> {
    let image = to_8bit(image);
    let (width, height) = (image.width(), image.height());
    let (stride, color_channels) = layout(&image);

    let smoothed = match &image {
        DynamicImage::ImageLuma8(buf) => {
            let out: GrayImage = filter3x3(buf, &SMOOTH_KERNEL);
            DynamicImage::ImageLuma8(out)
        }
        DynamicImage::ImageLumaA8(buf) => {
            let out: GrayAlphaImage = filter3x3(buf, &SMOOTH_KERNEL);
            DynamicImage::ImageLumaA8(out)
        }
        DynamicImage::ImageRgb8(buf) => {
            let out: RgbImage = filter3x3(buf, &SMOOTH_KERNEL);
            DynamicImage::ImageRgb8(out)
        }
        DynamicImage::ImageRgba8(buf) => {
            let out: RgbaImage = filter3x3(buf, &SMOOTH_KERNEL);
            DynamicImage::ImageRgba8(out)
        }
        _ => return Ok(image),
    };

    let mut result = image.clone();
    let original = image.as_bytes();
    let reference = smoothed.as_bytes();
    if let Some(raw) = super::raw_bytes_mut(&mut result) {
        for (i, pixel) in raw.chunks_exact_mut(stride).enumerate() {
            let x = i as u32 % width;
            let y = i as u32 / width;
            // Border pixels have no full neighborhood and stay as they are
            if x == 0 || y == 0 || x + 1 == width || y + 1 == height {
                continue;
            }
            let offset = i * stride;
            for c in 0..color_channels {
                pixel[c] = blend(
                    reference[offset + c] as f32,
                    original[offset + c] as f32,
                    factor,
                );
            }
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb};

    fn edge_image() -> GrayImage {
        // Left half dark, right half light
        GrayImage::from_fn(20, 10, |x, _| if x < 10 { Luma([50]) } else { Luma([200]) })
    }

    #[test]
    fn test_sharpen_enhances_edges() {
        let result = apply(DynamicImage::ImageLuma8(edge_image()), 2.0).unwrap();
        let gray = result.to_luma8();

        let edge_left = gray.get_pixel(9, 5).0[0];
        let edge_right = gray.get_pixel(10, 5).0[0];

        let original_diff = 200i32 - 50;
        let result_diff = (edge_right as i32 - edge_left as i32).abs();
        assert!(
            result_diff > original_diff,
            "Edge should be enhanced: {} > {}",
            result_diff,
            original_diff
        );
    }

    #[test]
    fn test_zero_sharpness_blurs_edges() {
        let result = apply(DynamicImage::ImageLuma8(edge_image()), 0.0).unwrap();
        let gray = result.to_luma8();
        let result_diff = gray.get_pixel(10, 5).0[0] as i32 - gray.get_pixel(9, 5).0[0] as i32;
        assert!(result_diff < 150);
    }

    #[test]
    fn test_sharpen_keeps_border_and_flat_areas() {
        let img = RgbImage::from_pixel(8, 8, Rgb([90, 120, 150]));
        let result = apply(DynamicImage::ImageRgb8(img), 1.8).unwrap();
        let rgb = result.to_rgb8();
        assert_eq!(rgb.get_pixel(0, 0).0, [90, 120, 150]);
        assert_eq!(rgb.get_pixel(4, 4).0, [90, 120, 150]);
    }
}
