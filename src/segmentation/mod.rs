mod onnx;
mod preprocess;
mod restore;
pub mod types;

pub use onnx::OnnxSegmenter;
pub use preprocess::{normalize, rgb_from_dynamic, Preprocessor};
pub use restore::{gray_to_rgb, restore_mask, MaskRestorer, RestoredMask, DEFAULT_THRESHOLD};
pub use types::{
    NormalizedTensor, OriginalSize, ProbabilityTensor, SegmentationModel, SemanticClass,
    MODEL_SIZE,
};

use anyhow::Result;
use std::path::Path;

/// Load an ONNX segmentation model behind the [`SegmentationModel`] trait
pub fn create_onnx_model<P: AsRef<Path>>(
    model_path: P,
    intra_threads: usize,
) -> Result<Box<dyn SegmentationModel>> {
    let model = OnnxSegmenter::new(model_path, intra_threads)?;
    Ok(Box::new(model))
}
