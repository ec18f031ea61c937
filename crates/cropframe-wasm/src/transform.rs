//! WASM bindings for the in-process image primitives.
//!
//! Hosts without their own codec can decode and crop through these; the
//! editor itself only ever sees uris and dimensions.

use crate::types::JsDecodedImage;
use cropframe_core::executor::PixelRect;
use cropframe_core::raster::{crop_pixels, DecodedImage};
use wasm_bindgen::prelude::*;

/// Decode JPEG or PNG bytes into RGB pixels.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const bytes = new Uint8Array(await file.arrayBuffer());
/// const image = decode_image(bytes);
/// editor.imageLoaded(url, image.width, image.height);
/// ```
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsDecodedImage, JsValue> {
    DecodedImage::decode(bytes)
        .map(JsDecodedImage::from_decoded)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Crop an image to a source-pixel rectangle.
///
/// Intended to be fed straight from `JsImageEditor.beginCrop()`.
///
/// # Arguments
///
/// * `image` - Source image to crop
/// * `origin_x`, `origin_y` - Top-left corner in source pixels
/// * `width`, `height` - Size of the region in source pixels
///
/// # Errors
///
/// Throws if the region is empty or extends past the image.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const req = editor.beginCrop();
/// const cropped = apply_crop(source, req.originX, req.originY, req.width, req.height);
/// ```
#[wasm_bindgen]
pub fn apply_crop(
    image: &JsDecodedImage,
    origin_x: u32,
    origin_y: u32,
    width: u32,
    height: u32,
) -> Result<JsDecodedImage, JsValue> {
    crop_region(image, PixelRect::new(origin_x, origin_y, width, height))
        .map_err(|e| JsValue::from_str(&e))
}

fn crop_region(image: &JsDecodedImage, rect: PixelRect) -> Result<JsDecodedImage, String> {
    let src = image.to_decoded();
    let result = crop_pixels(&src, &rect).map_err(|e| e.to_string())?;
    Ok(JsDecodedImage::from_decoded(result))
}


/// WASM-specific tests that require JsValue.
///
/// Use `wasm-pack test` to run these.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_apply_crop_out_of_bounds_throws() {
        let img = JsDecodedImage::new(10, 10, vec![0u8; 10 * 10 * 3]);
        assert!(apply_crop(&img, 5, 5, 10, 10).is_err());
    }

    #[wasm_bindgen_test]
    fn test_decode_garbage_throws() {
        assert!(decode_image(&[0, 1, 2, 3]).is_err());
    }
}
