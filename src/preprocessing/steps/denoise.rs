use super::to_8bit;
use crate::error::Error;
use image::DynamicImage;
use imageproc::filter::median_filter;

/// 3x3 median filter over every channel, removing isolated specks
/// while keeping glyph edges
pub fn apply(image: DynamicImage) -> Result<DynamicImage, Error> {
    let denoised = match to_8bit(image) {
        DynamicImage::ImageLuma8(buf) => DynamicImage::ImageLuma8(median_filter(&buf, 1, 1)),
        DynamicImage::ImageLumaA8(buf) => DynamicImage::ImageLumaA8(median_filter(&buf, 1, 1)),
        DynamicImage::ImageRgb8(buf) => DynamicImage::ImageRgb8(median_filter(&buf, 1, 1)),
        DynamicImage::ImageRgba8(buf) => DynamicImage::ImageRgba8(median_filter(&buf, 1, 1)),
        other => other,
    };
    Ok(denoised)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage};

    #[test]
    fn test_denoise_reduces_salt_pepper_noise() {
        let mut img = GrayImage::from_pixel(10, 10, Luma([128]));
        img.put_pixel(5, 5, Luma([0])); // "pepper" noise
        img.put_pixel(6, 5, Luma([255])); // "salt" noise

        let result = apply(DynamicImage::ImageLuma8(img.clone())).unwrap();
        let result_gray = result.to_luma8();

        assert!(calculate_variance(&result_gray) <= calculate_variance(&img));
        assert_eq!(result_gray.get_pixel(5, 5).0[0], 128);
    }

    #[test]
    fn test_denoise_keeps_color_mode() {
        let img = RgbImage::from_pixel(6, 6, Rgb([10, 20, 30]));
        let result = apply(DynamicImage::ImageRgb8(img)).unwrap();
        assert_eq!(result.color(), image::ColorType::Rgb8);
        assert_eq!(result.to_rgb8().get_pixel(3, 3).0, [10, 20, 30]);
    }

    fn calculate_variance(img: &GrayImage) -> f64 {
        let n = (img.width() * img.height()) as f64;
        let mean = img.pixels().map(|p| p.0[0] as f64).sum::<f64>() / n;
        img.pixels()
            .map(|p| (p.0[0] as f64 - mean).powi(2))
            .sum::<f64>()
            / n
    }
}
