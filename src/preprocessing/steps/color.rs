use super::{blend, layout, luma, raw_bytes_mut, to_8bit};
use crate::error::Error;
use image::DynamicImage;

/// Adjust color saturation by blending each pixel with its own gray value
/// Factor 0.0 gives a grayscale-looking RGB image; gray images pass through
pub fn apply(image: DynamicImage, factor: f32) -> Result<DynamicImage, Error> {
    let mut image = to_8bit(image);
    let (stride, color_channels) = layout(&image);
    if color_channels < 3 {
        return Ok(image);
    }

    if let Some(raw) = raw_bytes_mut(&mut image) {
        for pixel in raw.chunks_exact_mut(stride) {
            let gray = luma(pixel[0], pixel[1], pixel[2]) as f32;
            for channel in &mut pixel[..3] {
                *channel = blend(gray, *channel as f32, factor);
            }
        }
    }
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage};

    #[test]
    fn test_zero_color_desaturates() {
        let img = RgbImage::from_pixel(3, 3, Rgb([200, 50, 50]));
        let result = apply(DynamicImage::ImageRgb8(img), 0.0).unwrap();
        let [r, g, b] = result.to_rgb8().get_pixel(1, 1).0;
        assert_eq!(r, g);
        assert_eq!(g, b);
    }

    #[test]
    fn test_color_boost_moves_away_from_gray() {
        let img = RgbImage::from_pixel(3, 3, Rgb([150, 100, 100]));
        let result = apply(DynamicImage::ImageRgb8(img), 1.5).unwrap();
        let [r, g, _] = result.to_rgb8().get_pixel(0, 0).0;
        assert!(r > 150);
        assert!(g < 100);
    }

    #[test]
    fn test_color_ignores_gray_images() {
        let img = GrayImage::from_pixel(3, 3, Luma([77]));
        let result = apply(DynamicImage::ImageLuma8(img), 0.0).unwrap();
        assert_eq!(result.to_luma8().get_pixel(0, 0).0[0], 77);
    }
}
