use crate::error::Error;
use image::DynamicImage;

/// Deskew placeholder: returns the image unchanged
///
/// No skew angle is estimated, so there is nothing to rotate by. The step
/// still runs when requested so the pipeline reports it.
pub fn apply(image: DynamicImage) -> Result<DynamicImage, Error> {
    tracing::debug!("Deskew requested; skew estimation is not implemented, image left as is");
    Ok(image)
}
