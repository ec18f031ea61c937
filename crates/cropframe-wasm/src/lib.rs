//! Cropframe WASM - WebAssembly bindings for Cropframe
//!
//! This crate exposes the cropframe-core editor to JavaScript/TypeScript
//! hosts.
//!
//! # Module Structure
//!
//! - `editor` - `JsImageEditor`, the crop editor handle
//! - `types` - WASM-compatible wrapper types (images, rectangles, crop requests)
//! - `transform` - In-process decode and crop for hosts without their own codec
//! - `logger` - Routes `log` records to the browser console
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsImageEditor } from '@cropframe/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const editor = new JsImageEditor();
//! editor.imageLoaded(url, 4000, 3000);
//! editor.setContainerSize(800, 600);
//! ```

use wasm_bindgen::prelude::*;

mod editor;
mod logger;
mod transform;
mod types;

pub use editor::JsImageEditor;
pub use logger::set_log_level;
pub use transform::{apply_crop, decode_image};
pub use types::{JsCropRequest, JsDecodedImage, JsRect};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    logger::install(log::LevelFilter::Info);
    log::debug!("cropframe-wasm {} ready", version());
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
