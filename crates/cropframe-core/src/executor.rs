//! Crop execution: mapping the screen-space frame to source pixels and the
//! service traits the editor calls out to.
//!
//! # Coordinate transform
//!
//! ```text
//! origin_x = round((crop.x - bounds.x) * scale)
//! origin_y = round((crop.y - bounds.y) * scale)
//! width    = round(crop.width  * scale)
//! height   = round(crop.height * scale)
//! ```
//!
//! The result is then clamped to the source image so rounding can never
//! request pixels past its right or bottom edge.

use serde::{Deserialize, Serialize};

use crate::error::{CropPrimitiveError, ImageLoadError};
use crate::geometry::CropRect;
use crate::layout::ImageLayout;
use crate::ImageDescriptor;

/// Integer rectangle in source-pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PixelRect {
    pub origin_x: u32,
    pub origin_y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn new(origin_x: u32, origin_y: u32, width: u32, height: u32) -> Self {
        Self {
            origin_x,
            origin_y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether the rectangle lies within an image of the given size.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        u64::from(self.origin_x) + u64::from(self.width) <= u64::from(width)
            && u64::from(self.origin_y) + u64::from(self.height) <= u64::from(height)
    }
}

/// Everything the crop primitive needs: which image, which pixels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropRequest {
    pub uri: String,
    #[serde(flatten)]
    pub rect: PixelRect,
}

/// Loads an image and reports its pixel dimensions.
pub trait ImageLoader {
    fn load(&mut self, uri: &str) -> Result<ImageDescriptor, ImageLoadError>;
}

/// Crops an image, producing a new one.
///
/// The output dimensions are authoritative; they may differ from the
/// requested rectangle.
pub trait CropPrimitive {
    fn crop(&mut self, request: &CropRequest) -> Result<ImageDescriptor, CropPrimitiveError>;
}

fn round_to_pixels(value: f64) -> u32 {
    // `as` saturates: negatives and NaN become 0
    value.round() as u32
}

/// Map a screen-space crop rectangle to source pixels.
pub fn to_source_rect(crop: &CropRect, layout: &ImageLayout) -> PixelRect {
    let scale = layout.scale_factor;
    PixelRect {
        origin_x: round_to_pixels((crop.x - layout.bounds.x) * scale),
        origin_y: round_to_pixels((crop.y - layout.bounds.y) * scale),
        width: round_to_pixels(crop.width * scale),
        height: round_to_pixels(crop.height * scale),
    }
}

/// Build the crop request for `image`, clamping the mapped rectangle to the
/// image and keeping it at least 1×1.
pub fn build_crop_request(
    crop: &CropRect,
    layout: &ImageLayout,
    image: &ImageDescriptor,
) -> CropRequest {
    let mut rect = to_source_rect(crop, layout);

    rect.origin_x = rect.origin_x.min(image.width.saturating_sub(1));
    rect.origin_y = rect.origin_y.min(image.height.saturating_sub(1));
    rect.width = rect.width.clamp(1, (image.width - rect.origin_x).max(1));
    rect.height = rect.height.clamp(1, (image.height - rect.origin_y).max(1));

    CropRequest {
        uri: image.uri.clone(),
        rect,
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
