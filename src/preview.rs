//! Preview grids and before/after comparison images

use crate::error::Error;
use crate::preprocessing::{EnhancementParams, Enhancer};
use image::{imageops, imageops::FilterType, DynamicImage, Rgb, RgbImage};

/// Background of grids and comparison canvases
const BACKGROUND: Rgb<u8> = Rgb([240, 240, 240]);
/// Grid cell size
const THUMB_SIZE: u32 = 300;
const GRID_COLUMNS: u32 = 3;
/// Spacing around images in a comparison
const MARGIN: u32 = 20;
/// Reserved band above the images in a comparison
const HEADER_HEIGHT: u32 = 40;

/// Default size of a single enhancement preview
pub const PREVIEW_SIZE: (u32, u32) = (400, 400);

/// Shrink an image to fit within the given box, keeping its aspect ratio.
/// Images that already fit are returned unchanged.
pub fn fit_within(image: &DynamicImage, max_width: u32, max_height: u32) -> DynamicImage {
    if image.width() <= max_width && image.height() <= max_height {
        return image.clone();
    }
    image.resize(max_width, max_height, FilterType::Lanczos3)
}

/// Variations shown in the default preview grid
pub fn default_variations() -> Vec<EnhancementParams> {
    let base = EnhancementParams::default();
    vec![
        base,
        EnhancementParams {
            brightness: 1.2,
            contrast: 1.2,
            ..base
        },
        EnhancementParams {
            contrast: 1.5,
            sharpness: 1.5,
            ..base
        },
        EnhancementParams {
            brightness: 0.9,
            contrast: 1.3,
            sharpness: 1.2,
            ..base
        },
        EnhancementParams {
            binarize: true,
            binarize_threshold: 128,
            ..base
        },
        EnhancementParams {
            denoise: true,
            sharpness: 1.3,
            ..base
        },
    ]
}

/// Render the original followed by one tile per variation, three per row
pub fn preview_grid(
    image: &DynamicImage,
    variations: &[EnhancementParams],
) -> Result<RgbImage, Error> {
    let tiles = variations.len() as u32 + 1;
    let columns = GRID_COLUMNS.min(tiles);
    let rows = tiles.div_ceil(columns);

    let mut grid = RgbImage::from_pixel(columns * THUMB_SIZE, rows * THUMB_SIZE, BACKGROUND);

    let original = fit_within(image, THUMB_SIZE, THUMB_SIZE);
    imageops::overlay(&mut grid, &original.to_rgb8(), 0, 0);

    for (i, params) in variations.iter().enumerate() {
        let enhanced = Enhancer::new(*params).enhance(image)?;
        let thumb = fit_within(&enhanced, THUMB_SIZE, THUMB_SIZE);

        let position = i as u32 + 1;
        let x = (position % columns) * THUMB_SIZE;
        let y = (position / columns) * THUMB_SIZE;
        imageops::overlay(&mut grid, &thumb.to_rgb8(), x as i64, y as i64);
    }

    Ok(grid)
}

/// Place the original and enhanced images side by side.
///
/// When sizes differ both are resized to the smaller width and height.
/// The band above the images is left blank; no text is drawn.
pub fn comparison_image(original: &DynamicImage, enhanced: &DynamicImage) -> RgbImage {
    let (left, right) = if original.width() != enhanced.width()
        || original.height() != enhanced.height()
    {
        let width = original.width().min(enhanced.width());
        let height = original.height().min(enhanced.height());
        (
            original.resize_exact(width, height, FilterType::Lanczos3),
            enhanced.resize_exact(width, height, FilterType::Lanczos3),
        )
    } else {
        (original.clone(), enhanced.clone())
    };

    let canvas_width = left.width() * 2 + MARGIN * 3;
    let canvas_height = left.height() + MARGIN * 2 + HEADER_HEIGHT;
    let mut canvas = RgbImage::from_pixel(canvas_width, canvas_height, BACKGROUND);

    let top = (MARGIN + HEADER_HEIGHT) as i64;
    imageops::overlay(&mut canvas, &left.to_rgb8(), MARGIN as i64, top);
    imageops::overlay(
        &mut canvas,
        &right.to_rgb8(),
        (left.width() + MARGIN * 2) as i64,
        top,
    );

    canvas
}
