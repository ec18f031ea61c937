//! Error types for the editor and its collaborators.

use thiserror::Error;

/// The container or the image has no usable extent.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    /// Container width or height is zero, negative or not finite.
    #[error("Degenerate container size: {width}x{height}")]
    DegenerateContainer { width: f64, height: f64 },

    /// Image width or height is zero.
    #[error("Degenerate image size: {width}x{height}")]
    DegenerateImage { width: u32, height: u32 },
}

/// Failures reported by an image load primitive.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ImageLoadError {
    /// Nothing is registered under the requested uri.
    #[error("Image not found: {0}")]
    NotFound(String),

    /// The image data could not be decoded.
    #[error("Failed to decode image: {0}")]
    Decode(String),
}

/// Failures reported by a crop primitive.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CropPrimitiveError {
    /// I/O error while reading the source or writing the result.
    #[error("I/O error: {0}")]
    Io(String),

    /// The requested rectangle is empty or outside the image.
    #[error("Invalid crop rectangle: {0}")]
    InvalidRect(String),

    /// The source image format cannot be cropped.
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),
}

/// Configuration rejected during validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Fixed aspect ratio must be a positive finite number, got {0}")]
    InvalidAspectRatio(f64),

    #[error("Minimum crop dimensions must be non-negative finite numbers, got {width}x{height}")]
    InvalidMinimumDimensions { width: f64, height: f64 },

    #[error("Control bar height must be a positive finite number, got {0}")]
    InvalidControlBarHeight(f64),
}

/// Errors surfaced by [`crate::ImageEditor`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditorError {
    #[error("Image load failed: {0}")]
    ImageLoad(#[from] ImageLoadError),

    #[error("Crop failed: {0}")]
    CropExecution(#[from] CropPrimitiveError),

    #[error(transparent)]
    DegenerateLayout(#[from] LayoutError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// No image or no layout is available yet.
    #[error("Editor is not ready")]
    NotReady,

    /// The crop overlay only accepts input in the cropping phase.
    #[error("Crop overlay is hidden while reviewing")]
    NotCropping,

    /// A pointer-down arrived while another gesture was still active.
    #[error("Another gesture is already in progress")]
    GestureInProgress,

    /// A crop was requested while the previous one is still outstanding.
    #[error("A crop is already in progress")]
    CropInProgress,

    /// A crop result arrived with no crop outstanding.
    #[error("No crop is in progress")]
    NoCropPending,
}
