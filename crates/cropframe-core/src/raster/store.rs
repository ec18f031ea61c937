//! In-memory image service.
//!
//! [`MemoryImageStore`] keeps decoded images keyed by uri and implements both
//! [`ImageLoader`] and [`CropPrimitive`], so the editor can run end to end
//! without a host. Every crop result is stored under a freshly minted uri.
//!
//! Only the most recent crop output is retained: minting a new one evicts
//! the previous output unless it is the source being cropped. Images
//! registered with `insert` stay until the caller `remove`s them.

use std::collections::HashMap;

use super::{crop_pixels, DecodedImage};
use crate::error::{CropPrimitiveError, ImageLoadError};
use crate::executor::{CropPrimitive, CropRequest, ImageLoader};
use crate::ImageDescriptor;

/// Scheme prefix for uris minted by the store.
pub const MEMORY_URI_SCHEME: &str = "memory://";

#[derive(Debug, Default)]
pub struct MemoryImageStore {
    images: HashMap<String, DecodedImage>,
    crops: u32,
    /// Uri of the last crop output, evicted when the next one is minted.
    last_crop: Option<String>,
}

impl MemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a decoded image under `uri`, replacing any previous one.
    pub fn insert(&mut self, uri: impl Into<String>, image: DecodedImage) -> ImageDescriptor {
        let uri = uri.into();
        let descriptor = ImageDescriptor::new(uri.clone(), image.width, image.height);
        self.images.insert(uri, image);
        descriptor
    }

    /// Decode `bytes` and register the result under `uri`.
    pub fn insert_encoded(
        &mut self,
        uri: impl Into<String>,
        bytes: &[u8],
    ) -> Result<ImageDescriptor, ImageLoadError> {
        let image = DecodedImage::decode(bytes)?;
        Ok(self.insert(uri, image))
    }

    pub fn get(&self, uri: &str) -> Option<&DecodedImage> {
        self.images.get(uri)
    }

    pub fn remove(&mut self, uri: &str) -> Option<DecodedImage> {
        self.images.remove(uri)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl ImageLoader for MemoryImageStore {
    fn load(&mut self, uri: &str) -> Result<ImageDescriptor, ImageLoadError> {
        let image = self
            .images
            .get(uri)
            .ok_or_else(|| ImageLoadError::NotFound(uri.to_string()))?;
        if image.is_empty() {
            return Err(ImageLoadError::Decode(format!("{uri} has no pixels")));
        }
        Ok(ImageDescriptor::new(uri, image.width, image.height))
    }
}

impl CropPrimitive for MemoryImageStore {
    fn crop(&mut self, request: &CropRequest) -> Result<ImageDescriptor, CropPrimitiveError> {
        let source = self
            .images
            .get(&request.uri)
            .ok_or_else(|| CropPrimitiveError::Io(format!("{} not found", request.uri)))?;
        let cropped = crop_pixels(source, &request.rect)?;

        if let Some(previous) = self.last_crop.take() {
            if previous != request.uri {
                log::debug!("Evicting superseded crop output {}", previous);
                self.images.remove(&previous);
            }
        }

        self.crops += 1;
        let uri = format!("{MEMORY_URI_SCHEME}crop/{}", self.crops);
        self.last_crop = Some(uri.clone());
        Ok(self.insert(uri, cropped))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::PixelRect;

    fn gray(width: u32, height: u32) -> DecodedImage {
        DecodedImage::new(width, height, vec![128u8; (width * height * 3) as usize])
    }

    #[test]
    fn test_load_registered_image() {
        let mut store = MemoryImageStore::new();
        store.insert("memory://photo", gray(40, 30));

        let descriptor = store.load("memory://photo").unwrap();
        assert_eq!(descriptor, ImageDescriptor::new("memory://photo", 40, 30));
    }

    #[test]
    fn test_load_missing_image() {
        let mut store = MemoryImageStore::new();
        assert_eq!(
            store.load("memory://missing"),
            Err(ImageLoadError::NotFound("memory://missing".to_string()))
        );
    }

    #[test]
    fn test_crop_mints_new_uri() {
        let mut store = MemoryImageStore::new();
        store.insert("memory://photo", gray(40, 30));
        let request = CropRequest {
            uri: "memory://photo".to_string(),
            rect: PixelRect::new(5, 5, 20, 10),
        };

        let first = store.crop(&request).unwrap();
        assert_eq!((first.width, first.height), (20, 10));
        assert!(first.uri.starts_with(MEMORY_URI_SCHEME));
        assert_eq!(store.get(&first.uri).map(|img| img.width), Some(20));

        let second = store.crop(&request).unwrap();
        assert_ne!(first.uri, second.uri);
        assert!(store.get(&second.uri).is_some());
    }

    #[test]
    fn test_repeated_crops_keep_only_latest_output() {
        let mut store = MemoryImageStore::new();
        store.insert("memory://photo", gray(40, 30));
        let request = CropRequest {
            uri: "memory://photo".to_string(),
            rect: PixelRect::new(0, 0, 10, 10),
        };

        let mut uris = Vec::new();
        for _ in 0..5 {
            uris.push(store.crop(&request).unwrap().uri);
        }

        assert_eq!(store.len(), 2);
        assert!(store.get("memory://photo").is_some());
        assert!(uris[..4].iter().all(|uri| store.get(uri).is_none()));
        assert!(store.get(&uris[4]).is_some());
    }

    #[test]
    fn test_cropping_a_crop_keeps_its_source() {
        let mut store = MemoryImageStore::new();
        store.insert("memory://photo", gray(40, 30));
        let first = store
            .crop(&CropRequest {
                uri: "memory://photo".to_string(),
                rect: PixelRect::new(0, 0, 20, 20),
            })
            .unwrap();

        let second = store
            .crop(&CropRequest {
                uri: first.uri.clone(),
                rect: PixelRect::new(0, 0, 10, 10),
            })
            .unwrap();

        assert!(store.get(&first.uri).is_some());
        assert_eq!(store.get(&second.uri).map(|img| img.width), Some(10));
    }

    #[test]
    fn test_insert_encoded() {
        let source = image::RgbImage::from_pixel(6, 4, image::Rgb([1, 2, 3]));
        let mut bytes = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(source)
            .write_to(&mut bytes, image::ImageFormat::Png)
            .unwrap();

        let mut store = MemoryImageStore::new();
        let descriptor = store.insert_encoded("memory://png", bytes.get_ref()).unwrap();
        assert_eq!(descriptor, ImageDescriptor::new("memory://png", 6, 4));
        assert_eq!(store.remove("memory://png").map(|img| img.byte_size()), Some(6 * 4 * 3));
        assert!(store.is_empty());

        assert!(matches!(
            store.insert_encoded("memory://bad", b"not an image"),
            Err(ImageLoadError::Decode(_))
        ));
    }

    #[test]
    fn test_crop_errors() {
        let mut store = MemoryImageStore::new();
        let request = CropRequest {
            uri: "memory://missing".to_string(),
            rect: PixelRect::new(0, 0, 1, 1),
        };
        assert!(matches!(store.crop(&request), Err(CropPrimitiveError::Io(_))));

        store.insert("memory://small", gray(4, 4));
        let request = CropRequest {
            uri: "memory://small".to_string(),
            rect: PixelRect::new(2, 2, 4, 4),
        };
        assert!(matches!(store.crop(&request), Err(CropPrimitiveError::InvalidRect(_))));
        assert_eq!(store.len(), 1);
    }
}
