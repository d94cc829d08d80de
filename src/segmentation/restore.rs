use super::types::OriginalSize;
use crate::error::{Error, Result};
use image::{imageops, imageops::FilterType, GrayImage, Luma, Rgb, RgbImage};
use ndarray::ArrayView2;

pub const DEFAULT_THRESHOLD: f32 = 0.5;

/// A restored mask, either as a 1-channel selector or a 3-channel preview
#[derive(Debug, Clone, PartialEq)]
pub enum RestoredMask {
    Binary(GrayImage),
    Rgb(RgbImage),
}

impl RestoredMask {
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            RestoredMask::Binary(mask) => mask.dimensions(),
            RestoredMask::Rgb(mask) => mask.dimensions(),
        }
    }
}

/// Turns model-resolution probability maps into binary masks at the
/// resolution of the image they came from.
///
/// Thresholding happens before resizing, so edges are blocky but every
/// output pixel is exactly 0 or 255.
#[derive(Debug, Clone, Copy)]
pub struct MaskRestorer {
    threshold: f32,
}

impl Default for MaskRestorer {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl MaskRestorer {
    pub fn new(threshold: f32) -> Result<Self> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(Error::InvalidThreshold(threshold));
        }
        Ok(Self { threshold })
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Single-channel {0, 255} mask at `original_size`
    pub fn binary(&self, mask: ArrayView2<'_, f32>, original_size: OriginalSize) -> Result<GrayImage> {
        let _span = tracing::debug_span!("restore_mask").entered();

        let (rows, cols) = mask.dim();
        if rows == 0 || cols == 0 {
            return Err(Error::invalid_shape("probability mask is empty"));
        }
        if original_size.is_empty() {
            return Err(Error::invalid_shape(format!(
                "cannot restore to {}x{}",
                original_size.width, original_size.height
            )));
        }

        // NaN compares false, so it lands on 0
        let threshold = self.threshold;
        let binary = GrayImage::from_fn(cols as u32, rows as u32, |x, y| {
            if mask[[y as usize, x as usize]] > threshold {
                Luma([255])
            } else {
                Luma([0])
            }
        });

        let (width, height) = original_size.dimensions();
        if binary.dimensions() == (width, height) {
            return Ok(binary);
        }

        let mut resized = imageops::resize(&binary, width, height, FilterType::Triangle);
        for pixel in resized.pixels_mut() {
            pixel[0] = if pixel[0] >= 128 { 255 } else { 0 };
        }
        Ok(resized)
    }

    /// Three identical channels, for display
    pub fn rgb(&self, mask: ArrayView2<'_, f32>, original_size: OriginalSize) -> Result<RgbImage> {
        Ok(gray_to_rgb(&self.binary(mask, original_size)?))
    }

    pub fn restore(
        &self,
        mask: ArrayView2<'_, f32>,
        original_size: OriginalSize,
        as_rgb: bool,
    ) -> Result<RestoredMask> {
        if as_rgb {
            self.rgb(mask, original_size).map(RestoredMask::Rgb)
        } else {
            self.binary(mask, original_size).map(RestoredMask::Binary)
        }
    }
}

/// Restore a probability mask with an explicit threshold
pub fn restore_mask(
    mask: ArrayView2<'_, f32>,
    original_size: OriginalSize,
    threshold: f32,
    as_rgb: bool,
) -> Result<RestoredMask> {
    MaskRestorer::new(threshold)?.restore(mask, original_size, as_rgb)
}

/// Broadcast a grayscale mask to three channels
pub fn gray_to_rgb(mask: &GrayImage) -> RgbImage {
    RgbImage::from_fn(mask.width(), mask.height(), |x, y| {
        let value = mask.get_pixel(x, y)[0];
        Rgb([value, value, value])
    })
}
