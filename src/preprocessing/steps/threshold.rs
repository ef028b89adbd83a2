use super::to_gray;
use crate::error::Error;
use image::{DynamicImage, GrayImage, Luma};

/// Convert to 601 grayscale and apply a fixed global threshold
/// Pixels below `threshold` become black (0), the rest white (255)
pub fn apply(image: DynamicImage, threshold: u8) -> Result<DynamicImage, Error> {
    let gray = to_gray(&image);
    let binarized = GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        if gray.get_pixel(x, y).0[0] < threshold {
            Luma([0u8])
        } else {
            Luma([255u8])
        }
    });
    Ok(DynamicImage::ImageLuma8(binarized))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::collections::HashSet;

    #[test]
    fn test_threshold_binarizes_image() {
        let img = GrayImage::from_fn(50, 50, |x, _| Luma([(x as u8 * 5).min(255)]));

        let result = apply(DynamicImage::ImageLuma8(img), 128).unwrap();
        let values: HashSet<u8> = result.to_luma8().pixels().map(|p| p.0[0]).collect();

        assert!(values.len() <= 2);
        assert!(values.iter().all(|v| *v == 0 || *v == 255));
    }

    #[test]
    fn test_threshold_boundary_is_white() {
        let mut img = GrayImage::from_pixel(3, 1, Luma([99]));
        img.put_pixel(1, 0, Luma([100]));
        img.put_pixel(2, 0, Luma([101]));

        let result = apply(DynamicImage::ImageLuma8(img), 100).unwrap().to_luma8();
        assert_eq!(result.get_pixel(0, 0).0[0], 0);
        assert_eq!(result.get_pixel(1, 0).0[0], 255);
        assert_eq!(result.get_pixel(2, 0).0[0], 255);
    }

    #[test]
    fn test_saturated_color_uses_601_luma() {
        // Luma 130: white at 128 even though Rec. 709 weights would give 125
        let img = RgbImage::from_pixel(2, 2, Rgb([200, 100, 100]));
        let result = apply(DynamicImage::ImageRgb8(img.clone()), 128).unwrap();
        assert_eq!(result.to_luma8().get_pixel(0, 0).0[0], 255);

        let result = apply(DynamicImage::ImageRgb8(img), 131).unwrap();
        assert_eq!(result.to_luma8().get_pixel(1, 1).0[0], 0);
    }

    #[test]
    fn test_threshold_converts_color_to_gray() {
        let img = RgbImage::from_pixel(4, 4, Rgb([250, 250, 250]));
        let result = apply(DynamicImage::ImageRgb8(img), 128).unwrap();
        assert_eq!(result.color(), image::ColorType::L8);
        assert_eq!(result.to_luma8().get_pixel(0, 0).0[0], 255);
    }
}
