use super::types::{NormalizedTensor, OriginalSize, INPUT_CHANNELS, MODEL_SIZE};
use crate::error::{Error, Result};
use crate::resample::resize_area;
use image::{DynamicImage, RgbImage};
use ndarray::Array4;

/// Preprocessor for converting RGB images to model input tensors
#[derive(Debug, Clone, Copy)]
pub struct Preprocessor {
    target_width: u32,
    target_height: u32,
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new(MODEL_SIZE, MODEL_SIZE)
    }
}

impl Preprocessor {
    pub fn new(target_width: u32, target_height: u32) -> Self {
        Self {
            target_width,
            target_height,
        }
    }

    /// Preprocess an RGB image into a normalized NHWC tensor
    ///
    /// Steps:
    /// 1. Record the original (height, width)
    /// 2. Resize to target dimensions with area averaging
    /// 3. Convert to float and divide each channel by 255
    /// 4. Add a leading batch dimension
    ///
    /// Returns: Array4<f32> with shape [1, height, width, 3]
    pub fn normalize(&self, image: &RgbImage) -> Result<(NormalizedTensor, OriginalSize)> {
        let _span = tracing::debug_span!("preprocess").entered();

        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(Error::invalid_shape(format!(
                "image has no pixels ({width}x{height})"
            )));
        }
        let original_size = OriginalSize::new(height, width);

        let resized = resize_area(image, self.target_width, self.target_height);

        let mut tensor = Array4::<f32>::zeros((
            1,
            self.target_height as usize,
            self.target_width as usize,
            INPUT_CHANNELS,
        ));
        for (x, y, pixel) in resized.enumerate_pixels() {
            let (x, y) = (x as usize, y as usize);
            tensor[[0, y, x, 0]] = f32::from(pixel[0]) / 255.0;
            tensor[[0, y, x, 1]] = f32::from(pixel[1]) / 255.0;
            tensor[[0, y, x, 2]] = f32::from(pixel[2]) / 255.0;
        }

        tracing::debug!(
            "Normalized {}x{} image to {}x{}",
            width,
            height,
            self.target_width,
            self.target_height
        );

        Ok((tensor, original_size))
    }
}

/// Normalize an image to the default 256x256 model input
pub fn normalize(image: &RgbImage) -> Result<(NormalizedTensor, OriginalSize)> {
    Preprocessor::default().normalize(image)
}

/// Accept a decoded image only if it is 8-bit, 3-channel RGB
///
/// Images with alpha or a single channel must be converted by the caller
/// before they enter the pipeline.
pub fn rgb_from_dynamic(image: DynamicImage) -> Result<RgbImage> {
    match image {
        DynamicImage::ImageRgb8(rgb) => Ok(rgb),
        other => Err(Error::invalid_shape(format!(
            "expected 3-channel RGB8 pixels, got {:?} with {} channels",
            other.color(),
            other.color().channel_count()
        ))),
    }
}
