use crate::pipeline::SegmentationReport;
use anyhow::{Context, Result};
use image::RgbImage;
use std::fs;
use std::path::{Path, PathBuf};

/// Encode `image` to `path`; the format follows the file extension
pub fn save_rgb<P: AsRef<Path>>(image: &RgbImage, path: P) -> Result<()> {
    let path = path.as_ref();
    image
        .save(path)
        .with_context(|| format!("Failed to write image {}", path.display()))?;
    tracing::debug!("Wrote {}", path.display());
    Ok(())
}

/// Write the original image and every class mask into `dir` as PNG.
///
/// Files are named after their labels (`original image.png`,
/// `background.png`, `hair.png`, ...). Returns the written paths in order.
pub fn export_segmentation<P: AsRef<Path>>(
    report: &SegmentationReport,
    dir: P,
) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let mut written = Vec::with_capacity(report.masks.len() + 1);

    let original = dir.join("original image.png");
    save_rgb(&report.original, &original)?;
    written.push(original);

    for mask in &report.masks {
        let path = dir.join(format!("{}.png", mask.class.label()));
        save_rgb(&mask.image, &path)?;
        written.push(path);
    }

    tracing::info!("Exported {} images to {}", written.len(), dir.display());

    Ok(written)
}
