//! Crop frame state and gesture handling.
//!
//! [`CropOverlay`] owns the committed crop rectangle and the state of the
//! single active gesture. Pointer moves only update a transient preview;
//! the rectangle is clamped and committed when the gesture ends.
//!
//! # Gesture states
//!
//! ```text
//! Idle --pointer_down--> Classified --pointer_move--> Dragging
//!   ^                        |                           |
//!   +-------pointer_up / pointer_cancel------------------+
//! ```
//!
//! # Commit rules
//!
//! Move: each axis is clamped independently so the frame stays inside the
//! image bounds; the size is untouched.
//!
//! Resize (corners only):
//! 1. size is clamped to `[minimum, bounds]`, re-deriving the paired axis
//!    in fixed-ratio mode
//! 2. the edges opposite the dragged corner stay where they were
//! 3. edges that still protrude are pulled back inside the bounds, which
//!    shrinks the frame; in fixed-ratio mode the other axis follows

use crate::config::AspectMode;
use crate::error::EditorError;
use crate::geometry::{CropRect, LayoutBounds, Point, Rect, Size, Translation};

use super::handle::{HandleAction, HandleRegion};

/// Fraction of the tighter bounds dimension used for the initial frame.
pub const DEFAULT_CROP_FRACTION: f64 = 0.8;

/// Smallest extent, in screen pixels, the frame can shrink to on either
/// axis regardless of the configured minimum. A zero-area frame has no
/// aspect ratio and cannot be grabbed again.
pub const MIN_FRAME_EXTENT: f64 = 1.0;

/// Progress of the current gesture.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    /// No pointer is down.
    #[default]
    Idle,
    /// Pointer is down and its region is known; nothing has moved yet.
    Classified { region: HandleRegion },
    /// Pointer has moved; `translation` is cumulative since pointer-down.
    Dragging {
        region: HandleRegion,
        translation: Translation,
    },
}

impl GestureState {
    fn region(self) -> Option<HandleRegion> {
        match self {
            GestureState::Idle => None,
            GestureState::Classified { region } | GestureState::Dragging { region, .. } => {
                Some(region)
            }
        }
    }
}

/// The crop frame over a laid-out image.
#[derive(Debug, Clone, PartialEq)]
pub struct CropOverlay {
    bounds: LayoutBounds,
    aspect: AspectMode,
    minimum: Size,
    rect: CropRect,
    gesture: GestureState,
}

impl CropOverlay {
    /// Create an overlay over `bounds` with the frame at its default
    /// position.
    pub fn new(bounds: LayoutBounds, aspect: AspectMode, minimum: Size) -> Self {
        let mut overlay = Self {
            bounds,
            aspect,
            minimum,
            rect: bounds,
            gesture: GestureState::Idle,
        };
        overlay.reset();
        overlay
    }

    pub fn bounds(&self) -> LayoutBounds {
        self.bounds
    }

    pub fn aspect(&self) -> AspectMode {
        self.aspect
    }

    pub fn minimum(&self) -> Size {
        self.minimum
    }

    /// The committed crop rectangle.
    pub fn rect(&self) -> CropRect {
        self.rect
    }

    pub fn gesture(&self) -> GestureState {
        self.gesture
    }

    pub fn is_idle(&self) -> bool {
        self.gesture == GestureState::Idle
    }

    /// Region of the active gesture, [`HandleRegion::None`] when idle.
    pub fn active_region(&self) -> HandleRegion {
        self.gesture.region().unwrap_or_default()
    }

    /// The frame centered in the bounds, at 80% of the tighter dimension.
    pub fn default_rect(&self) -> CropRect {
        let bounds = self.bounds;
        let size = match self.aspect {
            AspectMode::Dynamic => {
                let side = DEFAULT_CROP_FRACTION * bounds.width.min(bounds.height);
                Size::new(side, side)
            }
            AspectMode::Fixed(ratio) => {
                if ratio < bounds.width / bounds.height {
                    let height = DEFAULT_CROP_FRACTION * bounds.height;
                    Size::new(height * ratio, height)
                } else {
                    let width = DEFAULT_CROP_FRACTION * bounds.width;
                    Size::new(width, width / ratio)
                }
            }
        };
        Rect::centered_in(&bounds, self.clamp_size(size))
    }

    /// Put the frame back at its default position, dropping any gesture.
    pub fn reset(&mut self) {
        self.gesture = GestureState::Idle;
        self.rect = self.default_rect();
        log::debug!("Crop frame reset to {:?}", self.rect);
    }

    /// Replace the image bounds and reset the frame.
    pub fn set_bounds(&mut self, bounds: LayoutBounds) {
        self.bounds = bounds;
        self.reset();
    }

    /// Replace the sizing constraints and reset the frame.
    pub fn set_constraints(&mut self, aspect: AspectMode, minimum: Size) {
        self.aspect = aspect;
        self.minimum = minimum;
        self.reset();
    }

    /// Place the frame at `rect`, clamped to the constraints and bounds.
    pub fn set_rect(&mut self, rect: CropRect) {
        let size = self.clamp_size(rect.size());
        self.rect = self.clamp_position(Rect::new(rect.x, rect.y, size.width, size.height));
    }

    /// Live rectangle while dragging; not clamped and not committed.
    pub fn preview(&self) -> Option<CropRect> {
        match self.gesture {
            GestureState::Dragging {
                region,
                translation,
            } => Some(self.preview_rect(region, translation)),
            _ => None,
        }
    }

    /// What the host should draw: the preview while dragging, otherwise
    /// the committed frame.
    pub fn display_rect(&self) -> CropRect {
        self.preview().unwrap_or(self.rect)
    }

    /// Start a gesture at `point` (screen space).
    ///
    /// # Errors
    ///
    /// [`EditorError::GestureInProgress`] if a gesture is already active.
    pub fn pointer_down(&mut self, point: Point) -> Result<HandleRegion, EditorError> {
        if !self.is_idle() {
            log::warn!("Rejected pointer-down at {:?}: gesture in progress", point);
            return Err(EditorError::GestureInProgress);
        }

        let region = HandleRegion::classify(&self.rect, point);
        log::debug!("Pointer-down at {:?} classified as {:?}", point, region);
        self.gesture = GestureState::Classified { region };
        Ok(region)
    }

    /// Update the live preview with the cumulative `translation`.
    ///
    /// Returns the preview, or `None` when no gesture is active, the
    /// gesture started outside the frame, or the translation is not finite.
    pub fn pointer_move(&mut self, translation: Translation) -> Option<CropRect> {
        let region = self.gesture.region()?;
        if region.action() == HandleAction::Ignore || !translation.is_finite() {
            return None;
        }

        self.gesture = GestureState::Dragging {
            region,
            translation,
        };
        self.preview()
    }

    /// End the gesture with the final cumulative `translation`, committing
    /// the clamped result.
    pub fn pointer_up(&mut self, translation: Translation) -> CropRect {
        let Some(region) = self.gesture.region() else {
            return self.rect;
        };
        self.gesture = GestureState::Idle;

        let translation = if translation.is_finite() {
            translation
        } else {
            log::warn!("Ignoring non-finite release translation {:?}", translation);
            Translation::default()
        };

        match region.action() {
            HandleAction::Ignore => {}
            HandleAction::Move => self.commit_move(translation),
            HandleAction::Resize => self.commit_resize(region, translation),
        }
        log::debug!("Committed {:?} gesture: {:?}", region, self.rect);
        self.rect
    }

    /// Abandon the gesture without committing.
    pub fn pointer_cancel(&mut self) {
        if !self.is_idle() {
            log::debug!("Gesture cancelled; frame stays at {:?}", self.rect);
        }
        self.gesture = GestureState::Idle;
    }

    /// Whether the committed frame satisfies the bounds, minimum-size and
    /// aspect constraints. Minimums larger than the bounds are not
    /// enforceable and are skipped.
    pub fn satisfies_constraints(&self) -> bool {
        const TOLERANCE: f64 = 1e-6;
        let rect = self.rect;
        if !self.bounds.contains_rect(&rect) {
            return false;
        }

        let max = self.max_size();
        let min = self.min_size();
        let min_ok = (min.width > max.width + TOLERANCE || rect.width >= min.width - TOLERANCE)
            && (min.height > max.height + TOLERANCE || rect.height >= min.height - TOLERANCE);

        let ratio_ok = match self.aspect {
            AspectMode::Dynamic => true,
            AspectMode::Fixed(ratio) => (rect.width / rect.height - ratio).abs() < TOLERANCE,
        };

        min_ok && ratio_ok
    }

    fn preview_rect(&self, region: HandleRegion, translation: Translation) -> CropRect {
        match region.action() {
            HandleAction::Ignore => self.rect,
            HandleAction::Move => self.rect.translated(translation),
            HandleAction::Resize => {
                let (dx, dy) = self.resize_delta(region, translation);
                let width = (self.rect.width + dx).max(0.0);
                let height = (self.rect.height + dy).max(0.0);
                let x = if region.is_left() {
                    self.rect.right() - width
                } else {
                    self.rect.x
                };
                let y = if region.is_top() {
                    self.rect.bottom() - height
                } else {
                    self.rect.y
                };
                Rect::new(x, y, width, height)
            }
        }
    }

    /// Size change requested by a corner drag, positive meaning growth.
    ///
    /// In fixed-ratio mode the axis with the larger raw translation wins
    /// (ties go to the horizontal axis) and the other is derived from it.
    fn resize_delta(&self, region: HandleRegion, translation: Translation) -> (f64, f64) {
        let (sx, sy) = region.growth_signs();
        match self.aspect {
            AspectMode::Dynamic => (sx * translation.dx, sy * translation.dy),
            AspectMode::Fixed(ratio) => {
                if translation.dx.abs() >= translation.dy.abs() {
                    let dx = sx * translation.dx;
                    (dx, dx / ratio)
                } else {
                    let dy = sy * translation.dy;
                    (dy * ratio, dy)
                }
            }
        }
    }

    fn commit_move(&mut self, translation: Translation) {
        self.rect = self.clamp_position(self.rect.translated(translation));
    }

    fn commit_resize(&mut self, region: HandleRegion, translation: Translation) {
        let (dx, dy) = self.resize_delta(region, translation);
        let size = self.clamp_size(Size::new(self.rect.width + dx, self.rect.height + dy));

        // Keep the edges opposite the dragged corner in place
        let (mut left, mut right) = if region.is_left() {
            (self.rect.right() - size.width, self.rect.right())
        } else {
            (self.rect.x, self.rect.x + size.width)
        };
        let (mut top, mut bottom) = if region.is_top() {
            (self.rect.bottom() - size.height, self.rect.bottom())
        } else {
            (self.rect.y, self.rect.y + size.height)
        };

        // Pull protruding edges back inside, shrinking the frame
        let bounds = self.bounds;
        left = left.max(bounds.x);
        top = top.max(bounds.y);
        right = right.min(bounds.right());
        bottom = bottom.min(bounds.bottom());
        let mut width = (right - left).max(0.0);
        let mut height = (bottom - top).max(0.0);

        if let AspectMode::Fixed(ratio) = self.aspect {
            width = width.min(height * ratio);
            height = width / ratio;
            if region.is_left() {
                left = right - width;
            }
            if region.is_top() {
                top = bottom - height;
            }
        }

        self.rect = Rect::new(left, top, width, height);
    }

    fn clamp_position(&self, rect: CropRect) -> CropRect {
        let bounds = self.bounds;
        let clamp_axis = |start: f64, len: f64, min: f64, max: f64| {
            if start < min {
                min
            } else if start + len > max {
                max - len
            } else {
                start
            }
        };

        Rect::new(
            clamp_axis(rect.x, rect.width, bounds.x, bounds.right()),
            clamp_axis(rect.y, rect.height, bounds.y, bounds.bottom()),
            rect.width,
            rect.height,
        )
    }

    /// Largest frame that fits the bounds under the aspect mode.
    fn max_size(&self) -> Size {
        let bounds = self.bounds.size();
        match self.aspect {
            AspectMode::Dynamic => bounds,
            AspectMode::Fixed(ratio) => {
                let width = bounds.width.min(bounds.height * ratio);
                Size::new(width, width / ratio)
            }
        }
    }

    /// Smallest frame that honours the minimum under the aspect mode,
    /// never below [`MIN_FRAME_EXTENT`] on either axis.
    fn min_size(&self) -> Size {
        let min_width = self.minimum.width.max(MIN_FRAME_EXTENT);
        let min_height = self.minimum.height.max(MIN_FRAME_EXTENT);
        match self.aspect {
            AspectMode::Dynamic => Size::new(min_width, min_height),
            AspectMode::Fixed(ratio) => {
                let width = min_width.max(min_height * ratio);
                Size::new(width, width / ratio)
            }
        }
    }

    /// Clamp `size` into `[min_size, max_size]`. The bounds win when the
    /// minimum does not fit.
    fn clamp_size(&self, size: Size) -> Size {
        let min = self.min_size();
        let max = self.max_size();
        match self.aspect {
            AspectMode::Dynamic => Size::new(
                size.width.max(min.width).min(max.width),
                size.height.max(min.height).min(max.height),
            ),
            AspectMode::Fixed(ratio) => {
                let width = size.width.max(min.width).min(max.width);
                Size::new(width, width / ratio)
            }
        }
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
