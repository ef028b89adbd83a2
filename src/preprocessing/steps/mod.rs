//! Individual enhancement steps
//!
//! Each step takes ownership of an image and returns the adjusted one.
//! Color steps work on 8-bit buffers and leave alpha channels untouched.

pub mod brightness;
pub mod color;
pub mod contrast;
pub mod denoise;
pub mod deskew;
pub mod resize;
pub mod sharpen;
pub mod threshold;

use image::{DynamicImage, GrayImage, Luma};

/// Reduce any non 8-bit image to the matching 8-bit layout
pub(crate) fn to_8bit(image: DynamicImage) -> DynamicImage {
    match image {
        DynamicImage::ImageLuma8(_)
        | DynamicImage::ImageLumaA8(_)
        | DynamicImage::ImageRgb8(_)
        | DynamicImage::ImageRgba8(_) => image,
        other => {
            let color = other.color();
            match (color.has_color(), color.has_alpha()) {
                (false, false) => DynamicImage::ImageLuma8(other.to_luma8()),
                (false, true) => DynamicImage::ImageLumaA8(other.to_luma_alpha8()),
                (true, false) => DynamicImage::ImageRgb8(other.to_rgb8()),
                (true, true) => DynamicImage::ImageRgba8(other.to_rgba8()),
            }
        }
    }
}

/// Pixel stride and number of leading color channels of an 8-bit image
pub(crate) fn layout(image: &DynamicImage) -> (usize, usize) {
    match image {
        DynamicImage::ImageLuma8(_) => (1, 1),
        DynamicImage::ImageLumaA8(_) => (2, 1),
        DynamicImage::ImageRgb8(_) => (3, 3),
        _ => (4, 3),
    }
}

/// Mutable raw bytes of an 8-bit image
pub(crate) fn raw_bytes_mut(image: &mut DynamicImage) -> Option<&mut [u8]> {
    match image {
        DynamicImage::ImageLuma8(buf) => Some(&mut **buf),
        DynamicImage::ImageLumaA8(buf) => Some(&mut **buf),
        DynamicImage::ImageRgb8(buf) => Some(&mut **buf),
        DynamicImage::ImageRgba8(buf) => Some(&mut **buf),
        _ => None,
    }
}

/// Apply `f` to every color channel, leaving alpha as is
pub(crate) fn map_color_channels<F>(image: DynamicImage, f: F) -> DynamicImage
where
    F: Fn(u8) -> u8,
{
    let mut image = to_8bit(image);
    let (stride, color_channels) = layout(&image);
    if let Some(raw) = raw_bytes_mut(&mut image) {
        for pixel in raw.chunks_exact_mut(stride) {
            for channel in &mut pixel[..color_channels] {
                *channel = f(*channel);
            }
        }
    }
    image
}

/// Blend a channel value towards `degenerate` and back out by `factor`
///
/// `factor` 0.0 yields the degenerate value, 1.0 the original. The result
/// is clipped to 0..=255 and truncated.
pub(crate) fn blend(degenerate: f32, original: f32, factor: f32) -> u8 {
    (degenerate + factor * (original - degenerate)).clamp(0.0, 255.0) as u8
}

/// ITU-R 601-2 luma, rounded to the nearest level
pub(crate) fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 * 299 + g as u32 * 587 + b as u32 * 114 + 500) / 1000) as u8
}

/// 8-bit grayscale copy using 601 luma for color images
pub(crate) fn to_gray(image: &DynamicImage) -> GrayImage {
    match image {
        DynamicImage::ImageLuma8(buf) => buf.clone(),
        _ if !image.color().has_color() => image.to_luma8(),
        _ => {
            let rgb = image.to_rgb8();
            GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
                let [r, g, b] = rgb.get_pixel(x, y).0;
                Luma([luma(r, g, b)])
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb, RgbImage, Rgba, RgbaImage};

    #[test]
    fn test_to_8bit_keeps_8bit_images() {
        let img = DynamicImage::ImageLuma8(GrayImage::new(4, 4));
        assert_eq!(to_8bit(img).color(), image::ColorType::L8);
    }

    #[test]
    fn test_to_8bit_reduces_16bit() {
        let img: ImageBuffer<Luma<u16>, Vec<u16>> = ImageBuffer::from_pixel(4, 4, Luma([65535]));
        let reduced = to_8bit(DynamicImage::ImageLuma16(img));
        assert_eq!(reduced.color(), image::ColorType::L8);
        assert_eq!(reduced.to_luma8().get_pixel(0, 0).0[0], 255);
    }

    #[test]
    fn test_map_color_channels_skips_alpha() {
        let img = RgbaImage::from_pixel(2, 2, Rgba([10, 20, 30, 40]));
        let result = map_color_channels(DynamicImage::ImageRgba8(img), |v| v.saturating_mul(2));
        assert_eq!(result.to_rgba8().get_pixel(1, 1).0, [20, 40, 60, 40]);
    }

    #[test]
    fn test_blend_clamps() {
        assert_eq!(blend(0.0, 200.0, 2.0), 255);
        assert_eq!(blend(128.0, 10.0, 3.0), 0);
        assert_eq!(blend(100.0, 50.0, 1.0), 50);
        assert_eq!(blend(100.0, 50.0, 0.0), 100);
    }

    #[test]
    fn test_blend_truncates() {
        assert_eq!(blend(0.0, 101.0, 1.5), 151);
        assert_eq!(blend(0.0, 99.0, 0.5), 49);
        assert_eq!(blend(10.0, 11.0, 0.99), 10);
    }

    #[test]
    fn test_luma_uses_601_weights() {
        assert_eq!(luma(200, 100, 100), 130);
        assert_eq!(luma(255, 255, 255), 255);
        assert_eq!(luma(0, 0, 255), 29);
        assert_eq!(luma(0, 255, 0), 150);
    }

    #[test]
    fn test_to_gray() {
        let rgb = RgbImage::from_pixel(3, 2, Rgb([200, 100, 100]));
        let gray = to_gray(&DynamicImage::ImageRgb8(rgb));
        assert_eq!(gray.dimensions(), (3, 2));
        assert!(gray.pixels().all(|p| p.0[0] == 130));

        let img = GrayImage::from_fn(4, 4, |x, y| Luma([(x * 40 + y) as u8]));
        assert_eq!(to_gray(&DynamicImage::ImageLuma8(img.clone())), img);
    }
}
