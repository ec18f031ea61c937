//! WASM bindings for the crop editor.
//!
//! `JsImageEditor` wraps [`ImageEditor`] for a JavaScript host. The host
//! renders, recognizes gestures and performs the actual crop; it forwards
//! layout and pointer events here and draws the rectangles it reads back.
//!
//! # Example (TypeScript)
//!
//! ```typescript
//! const editor = JsImageEditor.withConfig({ fixedAspectRatio: 16 / 9 });
//! editor.onComplete((image) => upload(image.uri));
//! editor.onCancel(() => closeModal());
//!
//! editor.imageLoaded(url, img.naturalWidth, img.naturalHeight);
//! editor.setContainerSize(view.clientWidth, view.clientHeight);
//!
//! editor.pointerDown(x, y);
//! editor.pointerMove(dx, dy);   // draw editor.displayRect
//! editor.pointerUp(dx, dy);
//!
//! const req = editor.beginCrop();
//! try {
//!   const out = await cropOnServer(req.uri, req.originX, req.originY, req.width, req.height);
//!   editor.completeCrop(out.uri, out.width, out.height);
//! } catch (e) {
//!   editor.failCrop(String(e));
//!   toast(editor.takeNotification());
//! }
//! ```

use std::fmt::Display;

use cropframe_core::config::EditorConfigPatch;
use cropframe_core::editor::{EditorOutcome, EditorPhase, ImageEditor};
use cropframe_core::error::{CropPrimitiveError, EditorError, ImageLoadError};
use cropframe_core::geometry::{Point, Size, Translation};
use cropframe_core::ImageDescriptor;
use wasm_bindgen::prelude::*;

use crate::types::{JsCropRequest, JsRect};

fn js_error(err: impl Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Crop editor handle for JavaScript.
#[wasm_bindgen]
pub struct JsImageEditor {
    inner: ImageEditor,
    on_cancel: Option<js_sys::Function>,
    on_complete: Option<js_sys::Function>,
}

#[wasm_bindgen]
impl JsImageEditor {
    /// Create an editor with the default configuration.
    #[wasm_bindgen(constructor)]
    pub fn new() -> JsImageEditor {
        Self::from_editor(ImageEditor::default())
    }

    /// Create an editor from a partial configuration object shaped like
    /// `{ fixedAspectRatio, minimumCropDimensions, dynamicCrop, editorOptions }`.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(patch: JsValue) -> Result<JsImageEditor, JsValue> {
        let patch: EditorConfigPatch = serde_wasm_bindgen::from_value(patch).map_err(js_error)?;
        let inner = ImageEditor::with_patch(patch).map_err(js_error)?;
        Ok(Self::from_editor(inner))
    }

    /// Merge a partial configuration into the current one.
    #[wasm_bindgen(js_name = updateConfig)]
    pub fn update_config(&mut self, patch: JsValue) -> Result<(), JsValue> {
        let patch: EditorConfigPatch = serde_wasm_bindgen::from_value(patch).map_err(js_error)?;
        self.inner.update_config(patch).map_err(js_error)
    }

    /// The full effective configuration, including theming.
    pub fn config(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.inner.config()).map_err(js_error)
    }

    /// Register the callback invoked when the session is cancelled.
    #[wasm_bindgen(js_name = onCancel)]
    pub fn set_on_cancel(&mut self, callback: Option<js_sys::Function>) {
        self.on_cancel = callback;
    }

    /// Register the callback invoked with `{ uri, width, height }` when the
    /// session is saved.
    #[wasm_bindgen(js_name = onComplete)]
    pub fn set_on_complete(&mut self, callback: Option<js_sys::Function>) {
        self.on_complete = callback;
    }

    // ------------------------------------------------------------------
    // Loading and layout
    // ------------------------------------------------------------------

    #[wasm_bindgen(js_name = beginLoad)]
    pub fn begin_load(&mut self) -> Result<(), JsValue> {
        self.inner.begin_load().map_err(js_error)
    }

    /// Report a loaded image and its natural size.
    #[wasm_bindgen(js_name = imageLoaded)]
    pub fn image_loaded(&mut self, uri: String, width: u32, height: u32) -> Result<(), JsValue> {
        self.load_descriptor(ImageDescriptor::new(uri, width, height))
            .map_err(js_error)
    }

    /// Report that the image could not be loaded. The editor stays
    /// not-ready and the load error is thrown back to the caller.
    #[wasm_bindgen(js_name = imageLoadFailed)]
    pub fn image_load_failed(&mut self, message: String) -> Result<(), JsValue> {
        self.record_load_failure(message).map_err(js_error)
    }

    /// Report the rendered container size. Returns `false` when the size is
    /// degenerate and was ignored.
    #[wasm_bindgen(js_name = setContainerSize)]
    pub fn set_container_size(&mut self, width: f64, height: f64) -> bool {
        self.inner
            .set_container_size(Size::new(width, height))
            .is_ok()
    }

    // ------------------------------------------------------------------
    // Gestures
    // ------------------------------------------------------------------

    /// Start a gesture. Returns the handle region name ("topLeft", "center", ..., or "none").
    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, x: f64, y: f64) -> Result<String, JsValue> {
        self.inner
            .pointer_down(Point::new(x, y))
            .map(|region| region.as_str().to_string())
            .map_err(js_error)
    }

    /// Feed the cumulative translation; returns the live preview.
    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, dx: f64, dy: f64) -> Result<Option<JsRect>, JsValue> {
        self.inner
            .pointer_move(Translation::new(dx, dy))
            .map(|preview| preview.map(JsRect::from))
            .map_err(js_error)
    }

    /// End the gesture; returns the committed rectangle.
    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self, dx: f64, dy: f64) -> Result<JsRect, JsValue> {
        self.inner
            .pointer_up(Translation::new(dx, dy))
            .map(JsRect::from)
            .map_err(js_error)
    }

    #[wasm_bindgen(js_name = pointerCancel)]
    pub fn pointer_cancel(&mut self) {
        self.inner.pointer_cancel();
    }

    // ------------------------------------------------------------------
    // State
    // ------------------------------------------------------------------

    /// Rectangle to draw: the preview while dragging, otherwise the committed frame.
    #[wasm_bindgen(getter, js_name = displayRect)]
    pub fn display_rect(&self) -> Option<JsRect> {
        self.inner.display_rect().map(JsRect::from)
    }

    #[wasm_bindgen(getter, js_name = cropRect)]
    pub fn crop_rect(&self) -> Option<JsRect> {
        self.inner.crop_rect().map(JsRect::from)
    }

    /// Screen-space rectangle covered by the image.
    #[wasm_bindgen(getter)]
    pub fn bounds(&self) -> Option<JsRect> {
        self.inner.layout().map(|layout| JsRect::from(layout.bounds))
    }

    #[wasm_bindgen(getter, js_name = scaleFactor)]
    pub fn scale_factor(&self) -> Option<f64> {
        self.inner.layout().map(|layout| layout.scale_factor)
    }

    /// "cropping" or "reviewing".
    #[wasm_bindgen(getter)]
    pub fn phase(&self) -> String {
        match self.inner.phase() {
            EditorPhase::Cropping => "cropping".to_string(),
            EditorPhase::Reviewing => "reviewing".to_string(),
        }
    }

    #[wasm_bindgen(getter, js_name = isReady)]
    pub fn is_ready(&self) -> bool {
        self.inner.is_ready()
    }

    #[wasm_bindgen(getter, js_name = isProcessing)]
    pub fn is_processing(&self) -> bool {
        self.inner.is_processing()
    }

    /// Uri of the image currently displayed.
    #[wasm_bindgen(getter, js_name = imageUri)]
    pub fn image_uri(&self) -> Option<String> {
        self.inner.image().map(|image| image.uri.clone())
    }

    #[wasm_bindgen(js_name = takeNotification)]
    pub fn take_notification(&mut self) -> Option<String> {
        self.inner.take_notification()
    }

    // ------------------------------------------------------------------
    // Cropping and session end
    // ------------------------------------------------------------------

    /// Map the frame to source pixels. The host performs the crop and
    /// reports back with `completeCrop` or `failCrop`.
    #[wasm_bindgen(js_name = beginCrop)]
    pub fn begin_crop(&mut self) -> Result<JsCropRequest, JsValue> {
        self.inner
            .begin_crop()
            .map(JsCropRequest::from)
            .map_err(js_error)
    }

    /// Report the cropped image. Its dimensions drive the review layout.
    #[wasm_bindgen(js_name = completeCrop)]
    pub fn complete_crop(&mut self, uri: String, width: u32, height: u32) -> Result<(), JsValue> {
        self.inner
            .finish_crop(Ok(ImageDescriptor::new(uri, width, height)))
            .map(|_| ())
            .map_err(js_error)
    }

    /// Report that the crop failed. A notification is queued; the frame and
    /// image are kept so the user can retry.
    #[wasm_bindgen(js_name = failCrop)]
    pub fn fail_crop(&mut self, message: String) -> Result<(), JsValue> {
        self.record_crop_failure(message).map_err(js_error)
    }

    /// Back button: cancels while cropping, returns to cropping while reviewing.
    pub fn back(&mut self) -> Result<(), JsValue> {
        match self.inner.back().map_err(js_error)? {
            Some(outcome) => self.dispatch(outcome),
            None => Ok(()),
        }
    }

    /// Save button: completes the session with the current image.
    pub fn save(&mut self) -> Result<(), JsValue> {
        let outcome = self.inner.save().map_err(js_error)?;
        self.dispatch(outcome)
    }

    /// Cancel button.
    pub fn cancel(&mut self) -> Result<(), JsValue> {
        let outcome = self.inner.cancel();
        self.dispatch(outcome)
    }
}

impl Default for JsImageEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl JsImageEditor {
    fn from_editor(inner: ImageEditor) -> Self {
        Self {
            inner,
            on_cancel: None,
            on_complete: None,
        }
    }

    fn load_descriptor(&mut self, descriptor: ImageDescriptor) -> Result<(), EditorError> {
        self.inner.finish_load(Ok(descriptor)).map(|_| ())
    }

    fn record_load_failure(&mut self, message: String) -> Result<(), EditorError> {
        self.inner
            .finish_load(Err(ImageLoadError::Decode(message)))
            .map(|_| ())
    }

    fn record_crop_failure(&mut self, message: String) -> Result<(), EditorError> {
        match self.inner.finish_crop(Err(CropPrimitiveError::Io(message))) {
            Err(EditorError::CropExecution(_)) | Ok(_) => Ok(()),
            Err(err) => Err(err),
        }
    }

    /// Hand a terminal outcome to the registered callback, if any.
    fn dispatch(&self, outcome: EditorOutcome) -> Result<(), JsValue> {
        match outcome {
            EditorOutcome::Cancelled => {
                if let Some(callback) = &self.on_cancel {
                    callback.call0(&JsValue::NULL)?;
                }
            }
            EditorOutcome::Completed(image) => {
                if let Some(callback) = &self.on_complete {
                    let value = serde_wasm_bindgen::to_value(&image).map_err(js_error)?;
                    callback.call1(&JsValue::NULL, &value)?;
                }
            }
        }
        Ok(())
    }
}


/// WASM-specific tests that require JsValue.
///
/// These tests cover configuration objects, thrown errors and callbacks and
/// can only run on wasm32 targets. Use `wasm-pack test` to run these.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn global(name: &str) -> JsValue {
        js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str(name)).unwrap()
    }

    #[wasm_bindgen_test]
    fn test_with_config_fixed_ratio() {
        let patch = js_sys::JSON::parse(r#"{"fixedAspectRatio": 2.0}"#).unwrap();
        let mut editor = JsImageEditor::with_config(patch).unwrap();
        editor.set_container_size(300.0, 300.0);
        editor.image_loaded("file://photo.jpg".to_string(), 400, 200).unwrap();

        let rect = editor.crop_rect().unwrap();
        assert_eq!((rect.width, rect.height), (240.0, 120.0));
    }

    #[wasm_bindgen_test]
    fn test_with_config_rejects_bad_ratio() {
        let patch = js_sys::JSON::parse(r#"{"fixedAspectRatio": -1}"#).unwrap();
        assert!(JsImageEditor::with_config(patch).is_err());
    }

    #[wasm_bindgen_test]
    fn test_image_load_failed_throws() {
        let mut editor = JsImageEditor::new();
        let err = editor.image_load_failed("404".to_string()).unwrap_err();
        assert!(err.as_string().unwrap_or_default().contains("404"));
        assert!(!editor.is_ready());
    }

    #[wasm_bindgen_test]
    fn test_image_loaded_during_crop_throws() {
        let mut editor = JsImageEditor::new();
        editor.set_container_size(300.0, 300.0);
        editor.image_loaded("file://a.jpg".to_string(), 400, 200).unwrap();
        editor.begin_crop().unwrap();

        assert!(editor.image_loaded("file://b.jpg".to_string(), 300, 300).is_err());
        assert_eq!(editor.image_uri().as_deref(), Some("file://a.jpg"));
    }

    #[wasm_bindgen_test]
    fn test_double_crop_throws() {
        let mut editor = JsImageEditor::new();
        editor.set_container_size(300.0, 300.0);
        editor.image_loaded("file://photo.jpg".to_string(), 400, 200).unwrap();
        editor.begin_crop().unwrap();
        assert!(editor.begin_crop().is_err());
    }

    #[wasm_bindgen_test]
    fn test_complete_callback() {
        let mut editor = JsImageEditor::new();
        editor.set_container_size(300.0, 300.0);
        editor.image_loaded("file://photo.jpg".to_string(), 400, 200).unwrap();
        editor.set_on_complete(Some(js_sys::Function::new_with_args(
            "image",
            "globalThis.__cropframeSaved = image.uri",
        )));

        editor.save().unwrap();
        assert_eq!(global("__cropframeSaved").as_string().as_deref(), Some("file://photo.jpg"));
    }

    #[wasm_bindgen_test]
    fn test_cancel_callback() {
        let mut editor = JsImageEditor::new();
        editor.set_on_cancel(Some(js_sys::Function::new_no_args(
            "globalThis.__cropframeCancelled = true",
        )));

        editor.back().unwrap();
        assert_eq!(global("__cropframeCancelled").as_bool(), Some(true));
    }
}
