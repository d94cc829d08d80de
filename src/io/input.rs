use anyhow::{Context, Result};
use image::RgbImage;
use std::path::Path;

/// Decode an image file into 8-bit RGB.
///
/// Alpha is dropped and grayscale is expanded here, so the pipeline
/// only ever sees 3-channel pixels.
pub fn load_rgb<P: AsRef<Path>>(path: P) -> Result<RgbImage> {
    let path = path.as_ref();
    let image = image::open(path)
        .with_context(|| format!("Failed to open image {}", path.display()))?;

    tracing::debug!(
        "Loaded {} ({}x{}, {:?})",
        path.display(),
        image.width(),
        image.height(),
        image.color()
    );

    Ok(image.to_rgb8())
}
