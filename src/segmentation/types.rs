use anyhow::Result;
use ndarray::Array4;
use std::fmt;

/// Side length of the square model input and output, in pixels
pub const MODEL_SIZE: u32 = 256;

/// Number of channels in a normalized input tensor
pub const INPUT_CHANNELS: usize = 3;

/// Model input: shape [1, 256, 256, 3] (NHWC), values in [0, 1]
pub type NormalizedTensor = Array4<f32>;

/// Model output: shape [1, 256, 256, 6] (NHWC), one channel per [`SemanticClass`]
pub type ProbabilityTensor = Array4<f32>;

/// Image resolution before normalization, stored as (height, width)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OriginalSize {
    pub height: u32,
    pub width: u32,
}

impl OriginalSize {
    pub fn new(height: u32, width: u32) -> Self {
        Self { height, width }
    }

    /// Dimensions in the (width, height) order used by `image` resize calls
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Categories predicted by the portrait model.
///
/// The order is fixed: class `i` is channel `i` of the model output.
/// Nothing in the tensor carries this mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticClass {
    Background,
    Hair,
    BodySkin,
    FaceSkin,
    Clothes,
    Accessories,
}

impl SemanticClass {
    pub const ALL: [SemanticClass; 6] = [
        SemanticClass::Background,
        SemanticClass::Hair,
        SemanticClass::BodySkin,
        SemanticClass::FaceSkin,
        SemanticClass::Clothes,
        SemanticClass::Accessories,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Output channel holding this class
    pub fn channel(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            SemanticClass::Background => "background",
            SemanticClass::Hair => "hair",
            SemanticClass::BodySkin => "body-skin",
            SemanticClass::FaceSkin => "face-skin",
            SemanticClass::Clothes => "clothes",
            SemanticClass::Accessories => "accessories",
        }
    }
}

impl fmt::Display for SemanticClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Trait for segmentation models
/// Allows swapping inference backends (ONNX Runtime, test doubles, ...)
/// without touching the pipeline
pub trait SegmentationModel {
    /// Run the model on a normalized batch
    ///
    /// # Arguments
    /// * `input` - Tensor of shape [1, 256, 256, 3]
    ///
    /// # Returns
    /// * Probabilities of shape [1, 256, 256, 6], channels in [`SemanticClass`] order
    fn infer(&mut self, input: &NormalizedTensor) -> Result<ProbabilityTensor>;

    /// Name used in timing reports
    fn name(&self) -> &str;
}
