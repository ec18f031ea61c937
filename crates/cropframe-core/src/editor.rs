//! Editor state.
//!
//! [`ImageEditor`] is the single owner of everything the crop widget
//! tracks: the loaded image, the container layout, the crop overlay, the
//! editing phase and the `processing` flag. Hosts hold one editor per
//! widget and drive it with method calls; every mutation goes through a
//! method that keeps the overlay invariants.
//!
//! # Lifecycle
//!
//! 1. `begin_load` / `finish_load` (or `load_with`) install the image
//! 2. `set_container_size` lays it out and resets the crop frame
//! 3. pointer events move and resize the frame while `Cropping`
//! 4. `begin_crop` / `finish_crop` (or `crop_with`) produce the cropped
//!    image and switch to `Reviewing`
//! 5. `save`, `cancel` or `back` end the session
//!
//! Asynchronous hosts use the split `begin_*` / `finish_*` calls and must not
//! feed gestures in while [`ImageEditor::is_processing`] is set.

use serde::{Deserialize, Serialize};

use crate::config::{EditorConfig, EditorConfigPatch};
use crate::error::{CropPrimitiveError, EditorError, ImageLoadError, LayoutError};
use crate::executor::{build_crop_request, CropPrimitive, CropRequest, ImageLoader};
use crate::geometry::{CropRect, LayoutBounds, Point, Size, Translation};
use crate::layout::{compute_layout, ImageLayout};
use crate::overlay::{CropOverlay, HandleRegion};
use crate::ImageDescriptor;

/// Notification shown when the crop primitive fails.
pub const CROP_FAILED_MESSAGE: &str = "An error occurred while editing.";

/// Which half of the workflow the editor is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EditorPhase {
    /// Overlay visible, selection mutable.
    #[default]
    Cropping,
    /// Crop committed, result displayed, overlay hidden.
    Reviewing,
}

/// How an editing session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorOutcome {
    /// The user backed out; no image was produced.
    Cancelled,
    /// The user saved; carries the final image.
    Completed(ImageDescriptor),
}

/// Read-only snapshot of the crop state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropInfo {
    pub crop_rect: CropRect,
    pub bounds: LayoutBounds,
    pub scale_factor: f64,
}

#[derive(Debug, Clone)]
pub struct ImageEditor {
    config: EditorConfig,
    /// Image as first loaded; `back` returns to it.
    original: Option<ImageDescriptor>,
    /// Image currently displayed.
    image: Option<ImageDescriptor>,
    container: Option<Size>,
    layout: Option<ImageLayout>,
    overlay: Option<CropOverlay>,
    phase: EditorPhase,
    ready: bool,
    processing: bool,
    pending_crop: Option<CropRequest>,
    notification: Option<String>,
}

impl Default for ImageEditor {
    fn default() -> Self {
        Self::from_valid_config(EditorConfig::default())
    }
}

impl ImageEditor {
    /// Create an editor, validating `config` first.
    pub fn new(config: EditorConfig) -> Result<Self, EditorError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    /// Create an editor from the defaults overridden by `patch`.
    pub fn with_patch(patch: EditorConfigPatch) -> Result<Self, EditorError> {
        Ok(Self::from_valid_config(EditorConfig::from_patch(patch)?))
    }

    fn from_valid_config(config: EditorConfig) -> Self {
        Self {
            config,
            original: None,
            image: None,
            container: None,
            layout: None,
            overlay: None,
            phase: EditorPhase::Cropping,
            ready: false,
            processing: false,
            pending_crop: None,
            notification: None,
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn phase(&self) -> EditorPhase {
        self.phase
    }

    /// True once an image has loaded successfully.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// True while a load or crop is outstanding. Hosts should block input.
    pub fn is_processing(&self) -> bool {
        self.processing
    }

    /// Image currently displayed.
    pub fn image(&self) -> Option<&ImageDescriptor> {
        self.image.as_ref()
    }

    /// Image as first loaded.
    pub fn original_image(&self) -> Option<&ImageDescriptor> {
        self.original.as_ref()
    }

    pub fn layout(&self) -> Option<&ImageLayout> {
        self.layout.as_ref()
    }

    pub fn overlay(&self) -> Option<&CropOverlay> {
        self.overlay.as_ref()
    }

    /// The committed crop rectangle.
    pub fn crop_rect(&self) -> Option<CropRect> {
        self.overlay.as_ref().map(CropOverlay::rect)
    }

    /// Rectangle to draw: the live preview while dragging, otherwise the
    /// committed one.
    pub fn display_rect(&self) -> Option<CropRect> {
        self.overlay.as_ref().map(CropOverlay::display_rect)
    }

    pub fn crop_info(&self) -> Option<CropInfo> {
        let layout = self.layout.as_ref()?;
        let overlay = self.overlay.as_ref()?;
        Some(CropInfo {
            crop_rect: overlay.rect(),
            bounds: layout.bounds,
            scale_factor: layout.scale_factor,
        })
    }

    pub fn pending_crop(&self) -> Option<&CropRequest> {
        self.pending_crop.as_ref()
    }

    /// Take the pending user-visible notification, if any.
    pub fn take_notification(&mut self) -> Option<String> {
        self.notification.take()
    }

    // ------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------

    /// Merge `patch` into the configuration. An invalid patch leaves the
    /// current configuration in place. Geometry changes reset the frame.
    pub fn update_config(&mut self, patch: EditorConfigPatch) -> Result<(), EditorError> {
        let touches_geometry = patch.touches_geometry();
        let merged = self.config.clone().merge(patch)?;
        let geometry_changed = touches_geometry
            && (merged.aspect != self.config.aspect
                || merged.minimum_crop_dimensions != self.config.minimum_crop_dimensions);
        self.config = merged;

        if geometry_changed {
            if let Some(overlay) = self.overlay.as_mut() {
                overlay.set_constraints(self.config.aspect, self.config.minimum_crop_dimensions);
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Image loading
    // ------------------------------------------------------------------

    /// Mark a load as started.
    pub fn begin_load(&mut self) -> Result<(), EditorError> {
        if self.pending_crop.is_some() {
            return Err(EditorError::CropInProgress);
        }
        self.processing = true;
        Ok(())
    }

    /// Install the result of an image load.
    ///
    /// On success the image becomes both the original and the current
    /// image and the editor enters `Cropping`. On failure the editor is
    /// left not ready.
    ///
    /// # Errors
    ///
    /// [`EditorError::CropInProgress`] while a crop is outstanding; the
    /// result is dropped and the editor state is left untouched.
    pub fn finish_load(
        &mut self,
        result: Result<ImageDescriptor, ImageLoadError>,
    ) -> Result<ImageDescriptor, EditorError> {
        if self.pending_crop.is_some() {
            log::warn!("Rejected image load: crop still in progress");
            return Err(EditorError::CropInProgress);
        }
        self.processing = false;

        let descriptor = match result {
            Ok(descriptor) => descriptor,
            Err(err) => {
                log::warn!("Image load failed: {}", err);
                self.ready = false;
                return Err(err.into());
            }
        };

        if descriptor.is_empty() {
            log::warn!("Rejected {}x{} image {}", descriptor.width, descriptor.height, descriptor.uri);
            self.ready = false;
            return Err(LayoutError::DegenerateImage {
                width: descriptor.width,
                height: descriptor.height,
            }
            .into());
        }

        log::info!(
            "Loaded {} ({}x{})",
            descriptor.uri,
            descriptor.width,
            descriptor.height
        );
        self.original = Some(descriptor.clone());
        self.image = Some(descriptor.clone());
        self.phase = EditorPhase::Cropping;
        self.ready = true;
        self.relayout(true)?;
        Ok(descriptor)
    }

    /// Load `uri` through `loader`.
    pub fn load_with<L: ImageLoader + ?Sized>(
        &mut self,
        loader: &mut L,
        uri: &str,
    ) -> Result<ImageDescriptor, EditorError> {
        self.begin_load()?;
        let result = loader.load(uri);
        self.finish_load(result)
    }

    // ------------------------------------------------------------------
    // Layout
    // ------------------------------------------------------------------

    /// Record the rendered container size and recompute the layout.
    ///
    /// Degenerate sizes are ignored: the previous layout stays in place and
    /// [`EditorError::DegenerateLayout`] is returned.
    pub fn set_container_size(&mut self, size: Size) -> Result<(), EditorError> {
        if size.is_degenerate() {
            log::debug!("Ignoring degenerate container size {:?}", size);
            return Err(LayoutError::DegenerateContainer {
                width: size.width,
                height: size.height,
            }
            .into());
        }
        self.container = Some(size);
        self.relayout(false)
    }

    /// Recompute the layout for the current image and container. The frame
    /// is reset when the bounds change or when `force_reset` is set.
    fn relayout(&mut self, force_reset: bool) -> Result<(), EditorError> {
        let (Some(container), Some(image)) = (self.container, self.image.as_ref()) else {
            return Ok(());
        };

        let layout = compute_layout(container, image)?;
        let bounds_changed = self.layout.map(|l| l.bounds) != Some(layout.bounds);
        self.layout = Some(layout);

        match self.overlay.as_mut() {
            Some(overlay) => {
                if bounds_changed || force_reset {
                    overlay.set_bounds(layout.bounds);
                }
            }
            None => {
                self.overlay = Some(CropOverlay::new(
                    layout.bounds,
                    self.config.aspect,
                    self.config.minimum_crop_dimensions,
                ));
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Gestures
    // ------------------------------------------------------------------

    fn active_overlay(&mut self) -> Result<&mut CropOverlay, EditorError> {
        if !self.ready {
            return Err(EditorError::NotReady);
        }
        if self.phase != EditorPhase::Cropping {
            return Err(EditorError::NotCropping);
        }
        self.overlay.as_mut().ok_or(EditorError::NotReady)
    }

    /// Start a gesture at `point`.
    pub fn pointer_down(&mut self, point: Point) -> Result<HandleRegion, EditorError> {
        self.active_overlay()?.pointer_down(point)
    }

    /// Feed the cumulative translation of the active gesture. Returns the
    /// live preview, if the gesture produces one.
    pub fn pointer_move(&mut self, translation: Translation) -> Result<Option<CropRect>, EditorError> {
        Ok(self.active_overlay()?.pointer_move(translation))
    }

    /// End the active gesture and commit.
    pub fn pointer_up(&mut self, translation: Translation) -> Result<CropRect, EditorError> {
        Ok(self.active_overlay()?.pointer_up(translation))
    }

    /// Abandon the active gesture, if any.
    pub fn pointer_cancel(&mut self) {
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.pointer_cancel();
        }
    }

    // ------------------------------------------------------------------
    // Cropping
    // ------------------------------------------------------------------

    /// Map the committed frame to source pixels and mark the crop as
    /// outstanding.
    ///
    /// # Errors
    ///
    /// [`EditorError::CropInProgress`] if the previous crop has not
    /// finished; `NotReady` / `NotCropping` when there is nothing to crop.
    pub fn begin_crop(&mut self) -> Result<CropRequest, EditorError> {
        if self.pending_crop.is_some() {
            log::warn!("Rejected crop request: previous crop still in progress");
            return Err(EditorError::CropInProgress);
        }
        if !self.ready {
            return Err(EditorError::NotReady);
        }
        if self.phase != EditorPhase::Cropping {
            return Err(EditorError::NotCropping);
        }

        let (Some(image), Some(layout), Some(overlay)) =
            (self.image.as_ref(), self.layout.as_ref(), self.overlay.as_ref())
        else {
            return Err(EditorError::NotReady);
        };

        let request = build_crop_request(&overlay.rect(), layout, image);
        log::debug!("Crop request for {:?}: {:?}", overlay.rect(), request);

        self.processing = true;
        self.pending_crop = Some(request.clone());
        Ok(request)
    }

    /// Install the result of the outstanding crop.
    ///
    /// Success replaces the current image and switches to `Reviewing`.
    /// Failure leaves phase, image and frame untouched and queues a
    /// notification for the user.
    pub fn finish_crop(
        &mut self,
        result: Result<ImageDescriptor, CropPrimitiveError>,
    ) -> Result<ImageDescriptor, EditorError> {
        let Some(request) = self.pending_crop.take() else {
            return Err(EditorError::NoCropPending);
        };
        self.processing = false;

        let result = result.and_then(|descriptor| {
            if descriptor.is_empty() {
                Err(CropPrimitiveError::InvalidRect(format!(
                    "primitive returned a {}x{} image",
                    descriptor.width, descriptor.height
                )))
            } else {
                Ok(descriptor)
            }
        });

        match result {
            Ok(descriptor) => {
                log::info!(
                    "Cropped {} to {} ({}x{})",
                    request.uri,
                    descriptor.uri,
                    descriptor.width,
                    descriptor.height
                );
                self.image = Some(descriptor.clone());
                self.phase = EditorPhase::Reviewing;
                self.relayout(true)?;
                Ok(descriptor)
            }
            Err(err) => {
                log::warn!("Crop of {} failed: {}", request.uri, err);
                self.notification = Some(CROP_FAILED_MESSAGE.to_string());
                Err(err.into())
            }
        }
    }

    /// Crop through `primitive` in one step.
    pub fn crop_with<P: CropPrimitive + ?Sized>(
        &mut self,
        primitive: &mut P,
    ) -> Result<ImageDescriptor, EditorError> {
        let request = self.begin_crop()?;
        let result = primitive.crop(&request);
        self.finish_crop(result)
    }

    // ------------------------------------------------------------------
    // Session end
    // ------------------------------------------------------------------

    /// Back button.
    ///
    /// While cropping this cancels the session. While reviewing it
    /// discards the crop: the original image is restored, laid out again
    /// and the editor returns to `Cropping`.
    pub fn back(&mut self) -> Result<Option<EditorOutcome>, EditorError> {
        match self.phase {
            EditorPhase::Cropping => Ok(Some(self.cancel())),
            EditorPhase::Reviewing => {
                self.image = self.original.clone();
                self.phase = EditorPhase::Cropping;
                self.relayout(true)?;
                log::debug!("Returned to cropping the original image");
                Ok(None)
            }
        }
    }

    /// Finish the session with the current image.
    pub fn save(&mut self) -> Result<EditorOutcome, EditorError> {
        if self.pending_crop.is_some() {
            return Err(EditorError::CropInProgress);
        }
        let image = match (self.ready, self.image.clone()) {
            (true, Some(image)) => image,
            _ => return Err(EditorError::NotReady),
        };
        self.reset();
        Ok(EditorOutcome::Completed(image))
    }

    /// Abandon the session.
    pub fn cancel(&mut self) -> EditorOutcome {
        self.reset();
        EditorOutcome::Cancelled
    }

    /// Clear all session state. Configuration and container size survive.
    pub fn reset(&mut self) {
        let container = self.container;
        *self = Self::from_valid_config(self.config.clone());
        self.container = container;
    }
}
