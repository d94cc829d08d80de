//! Image codec boundary: decoding inputs and writing results to disk.

mod input;
mod output;

pub use input::load_rgb;
pub use output::{export_segmentation, save_rgb};
