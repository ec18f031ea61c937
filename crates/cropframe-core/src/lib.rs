//! Cropframe Core - crop overlay geometry engine
//!
//! This crate provides the platform-independent half of the Cropframe image
//! editor: fitting an image into a container, the interactive crop frame
//! (handle classification, move and resize with bounds, minimum-size and
//! aspect-ratio constraints), mapping the frame back to source pixels, and
//! the editor state that ties them together.
//!
//! Rendering, gesture recognition and image codecs belong to the host. The
//! host feeds container sizes and pointer events in and reads rectangles
//! out; image loading and cropping are reached through the
//! [`ImageLoader`] and [`CropPrimitive`] traits. [`raster`] provides an
//! in-process implementation of both.

pub mod config;
pub mod editor;
pub mod error;
pub mod executor;
pub mod geometry;
pub mod layout;
pub mod overlay;
pub mod raster;

pub use config::{AspectMode, EditorConfig, EditorConfigPatch};
pub use editor::{CropInfo, EditorOutcome, EditorPhase, ImageEditor};
pub use error::{ConfigError, CropPrimitiveError, EditorError, ImageLoadError, LayoutError};
pub use executor::{build_crop_request, CropPrimitive, CropRequest, ImageLoader, PixelRect};
pub use geometry::{CropRect, LayoutBounds, Point, Rect, Size, Translation};
pub use layout::{compute_layout, ImageLayout};
pub use overlay::{CropOverlay, HandleRegion};

/// An image the editor knows about: where it lives and how big it is.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ImageDescriptor {
    /// Opaque location understood by the host's loader and crop primitive
    pub uri: String,
    /// Width in source pixels
    pub width: u32,
    /// Height in source pixels
    pub height: u32,
}

impl ImageDescriptor {
    pub fn new(uri: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            uri: uri.into(),
            width,
            height,
        }
    }

    /// Pixel dimensions as a floating-point size.
    pub fn size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    /// Check if either dimension is zero
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}
