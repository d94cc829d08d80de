//! Compositors that turn restored masks into finished portraits.

mod background;
mod filters;
mod hair;

pub use background::{
    fit_to_cover, merge_parts, replace_background, split_by_mask, CoverFit, FitAxis,
};
pub use filters::{add_weighted, box_blur};
pub use hair::{recolor_hair, EDGE_BLUR_SIZE, ORIGINAL_WEIGHT, TINT_WEIGHT};
