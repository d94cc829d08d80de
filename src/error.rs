//! Error types for the segmentation and compositing pipeline.

use thiserror::Error;

/// Errors raised by the pipeline core.
///
/// Every variant is a precondition failure detected at the point of
/// violation; nothing is retried and no partial result is produced.
#[derive(Error, Debug)]
pub enum Error {
    /// The image is not 3-channel 2-D pixel data.
    #[error("invalid image shape: {reason}")]
    InvalidImageShape { reason: String },

    /// Mask threshold outside `[0, 1]`.
    #[error("invalid threshold {0}: must lie in [0, 1]")]
    InvalidThreshold(f32),

    /// Mask and image sizes disagree during compositing.
    #[error("dimension mismatch: image is {image_width}x{image_height}, mask is {mask_width}x{mask_height}")]
    DimensionMismatch {
        image_width: u32,
        image_height: u32,
        mask_width: u32,
        mask_height: u32,
    },

    /// The model failed; the source error is passed through untouched.
    #[error("inference failed in model {model}")]
    InferenceFailure {
        model: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    /// The model returned a tensor of the wrong shape.
    #[error("model {model} returned shape {actual:?}, expected {expected:?}")]
    UnexpectedOutputShape {
        model: String,
        expected: [usize; 4],
        actual: Vec<usize>,
    },

    /// A pipeline needs at least one model.
    #[error("no segmentation model configured")]
    NoModels,
}

impl Error {
    pub(crate) fn invalid_shape(reason: impl Into<String>) -> Self {
        Error::InvalidImageShape {
            reason: reason.into(),
        }
    }

    pub(crate) fn mismatch(image: (u32, u32), mask: (u32, u32)) -> Self {
        Error::DimensionMismatch {
            image_width: image.0,
            image_height: image.1,
            mask_width: mask.0,
            mask_height: mask.1,
        }
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;
