//! The segmentation pipeline handle.
//!
//! A [`SegmentationPipeline`] is built once by the application with its
//! models and passed by `&mut` into each operation. Every operation runs
//! normalize, inference on all models, then restore, and finishes with an
//! optional compositor.

use crate::compositing;
use crate::error::{Error, Result};
use crate::segmentation::{
    normalize, MaskRestorer, OriginalSize, ProbabilityTensor, SegmentationModel, SemanticClass,
    DEFAULT_THRESHOLD, MODEL_SIZE,
};
use crate::timing::{benchmark, ModelTiming};
use image::{GrayImage, Rgb, RgbImage};
use ndarray::s;

/// Settings shared by every pipeline call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineConfig {
    /// Probability above which a pixel belongs to a class
    pub threshold: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

/// A restored mask for one class, labelled for display
#[derive(Debug, Clone)]
pub struct ClassMask {
    pub class: SemanticClass,
    pub image: RgbImage,
}

/// Output of [`SegmentationPipeline::segment`]
#[derive(Debug, Clone)]
pub struct SegmentationReport {
    pub original: RgbImage,
    /// One mask per class, in [`SemanticClass::ALL`] order
    pub masks: Vec<ClassMask>,
    pub timings: Vec<ModelTiming>,
}

impl SegmentationReport {
    pub fn mask(&self, class: SemanticClass) -> Option<&RgbImage> {
        self.masks
            .iter()
            .find(|mask| mask.class == class)
            .map(|mask| &mask.image)
    }

    /// One line per model, e.g. "Inference of default took 12 ms."
    pub fn summary(&self) -> String {
        summarize(&self.timings)
    }
}

/// A composited image plus the inference timings that produced it
#[derive(Debug, Clone)]
pub struct Composite {
    pub image: RgbImage,
    pub timings: Vec<ModelTiming>,
}

impl Composite {
    pub fn summary(&self) -> String {
        summarize(&self.timings)
    }
}

/// Explicit owner of the loaded models.
///
/// The first model is the primary one: its output is restored into masks.
/// Any further models are run on the same input for timing comparison only.
pub struct SegmentationPipeline {
    models: Vec<Box<dyn SegmentationModel>>,
    restorer: MaskRestorer,
}

impl SegmentationPipeline {
    pub fn new(models: Vec<Box<dyn SegmentationModel>>, config: PipelineConfig) -> Result<Self> {
        if models.is_empty() {
            return Err(Error::NoModels);
        }
        let restorer = MaskRestorer::new(config.threshold)?;

        tracing::info!(
            "Pipeline ready with {} model(s), threshold={}",
            models.len(),
            restorer.threshold()
        );

        Ok(Self { models, restorer })
    }

    pub fn model_names(&self) -> Vec<&str> {
        self.models.iter().map(|model| model.name()).collect()
    }

    /// All six class masks as RGB images at the input's resolution
    pub fn segment(&mut self, image: &RgbImage) -> Result<SegmentationReport> {
        let _span = tracing::debug_span!("segment").entered();

        let (probabilities, original_size, timings) = self.run_models(image)?;

        let masks = SemanticClass::ALL
            .iter()
            .map(|&class| {
                let channel = probabilities.slice(s![0, .., .., class.channel()]);
                Ok(ClassMask {
                    class,
                    image: self.restorer.rgb(channel, original_size)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(SegmentationReport {
            original: image.clone(),
            masks,
            timings,
        })
    }

    /// Tint the hair of `image` with `color`
    pub fn recolor_hair(&mut self, image: &RgbImage, color: Rgb<u8>) -> Result<Composite> {
        let _span = tracing::debug_span!("recolor_hair_pipeline").entered();

        let (hair_mask, timings) = self.class_mask(image, SemanticClass::Hair)?;
        let image = compositing::recolor_hair(image, &hair_mask, color)?;

        Ok(Composite { image, timings })
    }

    /// Put `background` behind the subject of `foreground`
    pub fn replace_background(
        &mut self,
        background: &RgbImage,
        foreground: &RgbImage,
    ) -> Result<Composite> {
        let _span = tracing::debug_span!("replace_background_pipeline").entered();

        let (background_mask, timings) = self.class_mask(foreground, SemanticClass::Background)?;
        let image = compositing::replace_background(background, foreground, &background_mask)?;

        Ok(Composite { image, timings })
    }

    /// Single-channel mask of one class at the input's resolution
    pub fn class_mask(
        &mut self,
        image: &RgbImage,
        class: SemanticClass,
    ) -> Result<(GrayImage, Vec<ModelTiming>)> {
        let (probabilities, original_size, timings) = self.run_models(image)?;
        let channel = probabilities.slice(s![0, .., .., class.channel()]);
        let mask = self.restorer.binary(channel, original_size)?;
        Ok((mask, timings))
    }

    fn run_models(
        &mut self,
        image: &RgbImage,
    ) -> Result<(ProbabilityTensor, OriginalSize, Vec<ModelTiming>)> {
        let (tensor, original_size) = normalize(image)?;

        let bench = benchmark(&mut self.models, &tensor)?;
        let timings = bench.timings();
        for timing in &timings {
            tracing::info!("{}", timing);
        }

        let primary = bench.into_primary().ok_or(Error::NoModels)?;
        check_output_shape(&primary.name, &primary.output)?;

        Ok((primary.output, original_size, timings))
    }
}

fn check_output_shape(model: &str, output: &ProbabilityTensor) -> Result<()> {
    let side = MODEL_SIZE as usize;
    let expected = [1, side, side, SemanticClass::COUNT];
    if output.shape() != expected {
        return Err(Error::UnexpectedOutputShape {
            model: model.to_string(),
            expected,
            actual: output.shape().to_vec(),
        });
    }
    Ok(())
}

fn summarize(timings: &[ModelTiming]) -> String {
    timings
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
