//! Crop overlay: the draggable, resizable frame drawn over the image.
//!
//! - [`handle`] maps a pointer-down to one of nine grid cells of the frame
//! - [`engine`] owns the frame and turns gesture translations into clamped
//!   move and resize commits
//!
//! All coordinates are screen-space; see [`crate::layout`] for the mapping
//! to source pixels.

pub mod engine;
pub mod handle;

pub use engine::{CropOverlay, GestureState, DEFAULT_CROP_FRACTION, MIN_FRAME_EXTENT};
pub use handle::{HandleAction, HandleRegion};
