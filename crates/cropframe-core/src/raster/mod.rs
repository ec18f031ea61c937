//! In-process image services.
//!
//! Hosts normally supply their own image loading and cropping; this module
//! provides a self-contained implementation on top of RGB pixel buffers:
//!
//! - [`DecodedImage`] holds RGB pixel data (decoded with the `image` crate)
//! - [`crop_pixels`] copies a source-pixel rectangle out of a buffer
//! - [`MemoryImageStore`] implements the editor's loader and crop traits

mod crop;
mod store;
mod types;

pub use crop::crop_pixels;
pub use store::{MemoryImageStore, MEMORY_URI_SCHEME};
pub use types::DecodedImage;
