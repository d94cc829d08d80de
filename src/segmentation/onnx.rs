use super::types::{NormalizedTensor, ProbabilityTensor, SegmentationModel};
use anyhow::{Context, Result};
use ndarray::Ix4;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::TensorRef;
use std::path::Path;

/// Portrait segmentation model served by ONNX Runtime
///
/// Takes one NHWC input of shape [1, 256, 256, 3] and produces one NHWC
/// output of shape [1, 256, 256, 6]. Tensor names are not relied on.
pub struct OnnxSegmenter {
    session: Session,
    name: String,
}

impl OnnxSegmenter {
    /// Load a model from an ONNX file
    ///
    /// # Arguments
    /// * `model_path` - Path to the ONNX model file
    /// * `intra_threads` - Threads ONNX Runtime may use inside one operator
    pub fn new<P: AsRef<Path>>(model_path: P, intra_threads: usize) -> Result<Self> {
        let path = model_path.as_ref();

        tracing::info!("Loading segmentation model from {}", path.display());

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(intra_threads)?
            .commit_from_file(path)
            .with_context(|| format!("Failed to load model from {}", path.display()))?;

        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        tracing::info!("Model {} loaded successfully", name);

        Ok(Self { session, name })
    }
}

impl SegmentationModel for OnnxSegmenter {
    fn infer(&mut self, input: &NormalizedTensor) -> Result<ProbabilityTensor> {
        let _span = tracing::debug_span!("onnx_infer", model = %self.name).entered();

        let tensor = TensorRef::from_array_view(input.view()).context("Failed to build input tensor")?;

        let outputs = self
            .session
            .run(ort::inputs![tensor])
            .context("Failed to run inference")?;

        let output = outputs[0]
            .try_extract_array::<f32>()
            .context("Model output is not an f32 tensor")?
            .into_dimensionality::<Ix4>()
            .context("Expected a 4-D output tensor")?
            .to_owned();

        Ok(output)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
