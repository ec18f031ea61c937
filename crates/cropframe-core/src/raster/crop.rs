//! Pixel-buffer cropping.
//!
//! Unlike the screen-space geometry elsewhere in the crate, the rectangle
//! here is already in source pixels. Requests must lie fully inside the
//! image; the editor clamps before it asks.

use super::DecodedImage;
use crate::error::CropPrimitiveError;
use crate::executor::PixelRect;

/// Copy `rect` out of `image`.
///
/// # Errors
///
/// [`CropPrimitiveError::InvalidRect`] when the rectangle is empty or
/// extends past the image; [`CropPrimitiveError::UnsupportedFormat`] when
/// the buffer length does not match RGB at the stated dimensions.
pub fn crop_pixels(image: &DecodedImage, rect: &PixelRect) -> Result<DecodedImage, CropPrimitiveError> {
    if rect.is_empty() {
        return Err(CropPrimitiveError::InvalidRect(format!(
            "empty {}x{} region",
            rect.width, rect.height
        )));
    }
    if !rect.fits_within(image.width, image.height) {
        return Err(CropPrimitiveError::InvalidRect(format!(
            "{}x{}+{}+{} exceeds {}x{} image",
            rect.width, rect.height, rect.origin_x, rect.origin_y, image.width, image.height
        )));
    }

    let src_row_len = image.width as usize * 3;
    if image.pixels.len() != src_row_len * image.height as usize {
        return Err(CropPrimitiveError::UnsupportedFormat(format!(
            "{} bytes for a {}x{} RGB image",
            image.pixels.len(),
            image.width,
            image.height
        )));
    }

    // Fast path: full crop returns a clone
    if rect.width == image.width && rect.height == image.height {
        return Ok(image.clone());
    }

    let dst_row_len = rect.width as usize * 3;
    let mut output = Vec::with_capacity(dst_row_len * rect.height as usize);

    // Copy pixel data row by row
    for y in rect.origin_y..rect.origin_y + rect.height {
        let start = y as usize * src_row_len + rect.origin_x as usize * 3;
        output.extend_from_slice(&image.pixels[start..start + dst_row_len]);
    }

    Ok(DecodedImage::new(rect.width, rect.height, output))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Create a test image where each pixel has a unique value based on position.
    fn test_image(width: u32, height: u32) -> DecodedImage {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = ((y * width + x) % 256) as u8;
                pixels.push(v); // R
                pixels.push(v); // G
                pixels.push(v); // B
            }
        }
        DecodedImage::new(width, height, pixels)
    }

    #[test]
    fn test_full_crop() {
        let img = test_image(20, 10);
        let result = crop_pixels(&img, &PixelRect::new(0, 0, 20, 10)).unwrap();
        assert_eq!(result, img);
    }

    #[test]
    fn test_center_crop() {
        let img = test_image(10, 10);
        let result = crop_pixels(&img, &PixelRect::new(2, 2, 6, 6)).unwrap();

        assert_eq!(result.width, 6);
        assert_eq!(result.height, 6);
        // Value at (2, 2) = 2 * 10 + 2 = 22
        assert_eq!(result.pixels[0], 22);
        // Last pixel comes from (7, 7) = 77
        assert_eq!(result.pixels[result.pixels.len() - 1], 77);
    }

    #[test]
    fn test_rectangular_strip() {
        let img = test_image(200, 100);
        let result = crop_pixels(&img, &PixelRect::new(0, 0, 50, 100)).unwrap();

        assert_eq!((result.width, result.height), (50, 100));
        assert_eq!(result.pixels.len(), 50 * 100 * 3);
    }

    #[test]
    fn test_single_pixel() {
        let img = test_image(10, 10);
        let result = crop_pixels(&img, &PixelRect::new(9, 9, 1, 1)).unwrap();
        assert_eq!(result.pixels, vec![99, 99, 99]);
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let img = test_image(10, 10);
        let err = crop_pixels(&img, &PixelRect::new(8, 0, 3, 3)).unwrap_err();
        assert!(matches!(err, CropPrimitiveError::InvalidRect(_)));
    }

    #[test]
    fn test_empty_rejected() {
        let img = test_image(10, 10);
        let err = crop_pixels(&img, &PixelRect::new(0, 0, 0, 3)).unwrap_err();
        assert!(matches!(err, CropPrimitiveError::InvalidRect(_)));
    }

    #[test]
    fn test_malformed_buffer_rejected() {
        let img = DecodedImage {
            width: 10,
            height: 10,
            pixels: vec![0u8; 10],
        };
        let err = crop_pixels(&img, &PixelRect::new(0, 0, 2, 2)).unwrap_err();
        assert!(matches!(err, CropPrimitiveError::UnsupportedFormat(_)));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: in-bounds crops produce exactly the requested size and
        /// start at the requested pixel.
        #[test]
        fn prop_crop_matches_request(
            (width, height) in (1u32..=60, 1u32..=60),
            fx in 0.0f64..1.0,
            fy in 0.0f64..1.0,
            fw in 0.0f64..1.0,
            fh in 0.0f64..1.0,
        ) {
            let pixels: Vec<u8> = (0..width * height)
                .flat_map(|i| {
                    let v = (i % 251) as u8;
                    [v, v, v]
                })
                .collect();
            let img = DecodedImage::new(width, height, pixels);

            let x = (fx * f64::from(width)) as u32 % width;
            let y = (fy * f64::from(height)) as u32 % height;
            let w = 1 + (fw * f64::from(width - x - 1)) as u32;
            let h = 1 + (fh * f64::from(height - y - 1)) as u32;

            let result = crop_pixels(&img, &PixelRect::new(x, y, w, h)).unwrap();
            prop_assert_eq!((result.width, result.height), (w, h));
            prop_assert_eq!(result.pixels.len(), (w * h * 3) as usize);
            prop_assert_eq!(result.pixels[0], ((y * width + x) % 251) as u8);
        }
    }
}
