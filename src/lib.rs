//! Portrait segmentation effects.
//!
//! Normalizes a portrait for a six-class segmentation model, restores the
//! model's probability maps to binary masks at the portrait's resolution and
//! uses them to recolor hair or swap the background.
//!
//! ```no_run
//! use selfie_fx::{create_onnx_model, PipelineConfig, SegmentationPipeline};
//!
//! # fn main() -> anyhow::Result<()> {
//! let model = create_onnx_model("portrait.onnx", 4)?;
//! let mut pipeline = SegmentationPipeline::new(vec![model], PipelineConfig::default())?;
//!
//! let portrait = selfie_fx::io::load_rgb("me.jpg")?;
//! let dyed = pipeline.recolor_hair(&portrait, image::Rgb([180, 40, 200]))?;
//! selfie_fx::io::save_rgb(&dyed.image, "me-purple.png")?;
//! # Ok(())
//! # }
//! ```

pub mod compositing;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod resample;
pub mod segmentation;
pub mod timing;

pub use error::{Error, Result};
pub use pipeline::{ClassMask, Composite, PipelineConfig, SegmentationPipeline, SegmentationReport};
pub use segmentation::{create_onnx_model, SegmentationModel, SemanticClass};
