//! Letterbox layout of the displayed image inside its container.
//!
//! The image is drawn "contain"-style: scaled uniformly until it touches the
//! container on one axis, then centered on the other. This module computes
//! the screen-space rectangle actually covered by the image and the factor
//! that converts screen pixels back into source pixels.
//!
//! # Algorithm
//!
//! With tallness defined as `height / width`:
//!
//! - image taller than the container: the image spans the full container
//!   height and is inset horizontally, `scale = image_height / container_height`
//! - otherwise: the image spans the full container width and is inset
//!   vertically, `scale = image_width / container_width`

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;
use crate::geometry::{LayoutBounds, Rect, Size};
use crate::ImageDescriptor;

/// Result of mapping an image into a container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLayout {
    /// Container size this layout was computed for.
    pub container: Size,
    /// Sub-rectangle of the container covered by the image.
    pub bounds: LayoutBounds,
    /// Source pixels per screen pixel. Always > 0.
    pub scale_factor: f64,
}

/// Compute the letterboxed bounds and scale factor for `image` shown inside
/// a container of size `container`.
///
/// # Errors
///
/// Returns [`LayoutError`] when either the container or the image has no
/// extent; the aspect comparison would otherwise divide by zero.
pub fn compute_layout(container: Size, image: &ImageDescriptor) -> Result<ImageLayout, LayoutError> {
    if container.is_degenerate() {
        return Err(LayoutError::DegenerateContainer {
            width: container.width,
            height: container.height,
        });
    }
    if image.is_empty() {
        return Err(LayoutError::DegenerateImage {
            width: image.width,
            height: image.height,
        });
    }

    let image_width = f64::from(image.width);
    let image_height = f64::from(image.height);
    let image_tallness = image_height / image_width;
    let container_tallness = container.tallness();

    let (bounds, scale_factor) = if image_tallness > container_tallness {
        // Pillarbox: full height, horizontal inset
        let width = container.height / image_tallness;
        let bounds = Rect::new(
            (container.width - width) / 2.0,
            0.0,
            width,
            container.height,
        );
        (bounds, image_height / container.height)
    } else {
        // Letterbox: full width, vertical inset
        let height = container.width * image_tallness;
        let bounds = Rect::new(
            0.0,
            (container.height - height) / 2.0,
            container.width,
            height,
        );
        (bounds, image_width / container.width)
    };

    log::debug!(
        "Layout for {}x{} image in {}x{} container: bounds {:?}, scale {}",
        image.width,
        image.height,
        container.width,
        container.height,
        bounds,
        scale_factor
    );

    Ok(ImageLayout {
        container,
        bounds,
        scale_factor,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(width: u32, height: u32) -> ImageDescriptor {
        ImageDescriptor::new("memory://test", width, height)
    }

    #[test]
    fn test_landscape_image_in_square_container() {
        let layout = compute_layout(Size::new(300.0, 300.0), &image(400, 200)).unwrap();

        assert_eq!(layout.bounds, Rect::new(0.0, 75.0, 300.0, 150.0));
        assert!((layout.scale_factor - 400.0 / 300.0).abs() < 1e-12);
    }

    #[test]
    fn test_portrait_image_in_square_container() {
        let layout = compute_layout(Size::new(300.0, 300.0), &image(200, 400)).unwrap();

        assert_eq!(layout.bounds, Rect::new(75.0, 0.0, 150.0, 300.0));
        assert!((layout.scale_factor - 400.0 / 300.0).abs() < 1e-12);
    }

    #[test]
    fn test_matching_aspect_fills_container() {
        let layout = compute_layout(Size::new(200.0, 100.0), &image(4000, 2000)).unwrap();

        assert_eq!(layout.bounds, Rect::new(0.0, 0.0, 200.0, 100.0));
        assert!((layout.scale_factor - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_upscaled_small_image() {
        // Images smaller than the container are scaled up; the factor drops below 1
        let layout = compute_layout(Size::new(400.0, 800.0), &image(100, 100)).unwrap();

        assert_eq!(layout.bounds, Rect::new(0.0, 200.0, 400.0, 400.0));
        assert!((layout.scale_factor - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_container() {
        let err = compute_layout(Size::new(0.0, 300.0), &image(10, 10)).unwrap_err();
        assert!(matches!(err, LayoutError::DegenerateContainer { .. }));

        let err = compute_layout(Size::new(300.0, f64::NAN), &image(10, 10)).unwrap_err();
        assert!(matches!(err, LayoutError::DegenerateContainer { .. }));
    }

    #[test]
    fn test_degenerate_image() {
        let err = compute_layout(Size::new(300.0, 300.0), &image(0, 10)).unwrap_err();
        assert_eq!(
            err,
            LayoutError::DegenerateImage {
                width: 0,
                height: 10
            }
        );
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
