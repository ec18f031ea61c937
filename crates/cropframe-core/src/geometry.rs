//! Screen-space value types shared by the layout mapper, the crop overlay
//! and the crop executor.
//!
//! All values are in screen pixels (`f64`), with the origin at the top-left
//! corner of the rendering container.

use serde::{Deserialize, Serialize};

/// Tolerance used when comparing screen-space coordinates.
pub const GEOMETRY_EPSILON: f64 = 1e-6;

/// A point in screen space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A translation (cumulative pointer movement since pointer-down).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    pub dx: f64,
    pub dy: f64,
}

impl Translation {
    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    pub fn is_finite(&self) -> bool {
        self.dx.is_finite() && self.dy.is_finite()
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when either side is zero, negative or not a finite number.
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }

    /// Height divided by width.
    ///
    /// Callers must rule out degenerate sizes first.
    pub fn tallness(&self) -> f64 {
        self.height / self.width
    }
}

/// An axis-aligned rectangle given by its top-left corner and size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// The part of the container covered by the displayed image.
pub type LayoutBounds = Rect;

/// The current crop selection.
pub type CropRect = Rect;

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a rectangle of `size` centered inside `outer`.
    pub fn centered_in(outer: &Rect, size: Size) -> Self {
        Self {
            x: outer.x + (outer.width - size.width) / 2.0,
            y: outer.y + (outer.height - size.height) / 2.0,
            width: size.width,
            height: size.height,
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Same size, shifted by `translation`.
    pub fn translated(&self, translation: Translation) -> Self {
        Self {
            x: self.x + translation.dx,
            y: self.y + translation.dy,
            ..*self
        }
    }

    /// Check whether `point` lies inside this rectangle (edges inclusive).
    pub fn contains_point(&self, point: Point) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    /// Check whether `inner` fits inside this rectangle, allowing
    /// [`GEOMETRY_EPSILON`] of floating-point slack on every edge.
    pub fn contains_rect(&self, inner: &Rect) -> bool {
        inner.x >= self.x - GEOMETRY_EPSILON
            && inner.y >= self.y - GEOMETRY_EPSILON
            && inner.right() <= self.right() + GEOMETRY_EPSILON
            && inner.bottom() <= self.bottom() + GEOMETRY_EPSILON
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_degenerate() {
        assert!(Size::new(0.0, 10.0).is_degenerate());
        assert!(Size::new(10.0, -1.0).is_degenerate());
        assert!(Size::new(f64::NAN, 10.0).is_degenerate());
        assert!(Size::new(f64::INFINITY, 10.0).is_degenerate());
        assert!(!Size::new(1.0, 1.0).is_degenerate());
    }

    #[test]
    fn test_centered_in() {
        let outer = Rect::new(0.0, 75.0, 300.0, 150.0);
        let inner = Rect::centered_in(&outer, Size::new(120.0, 120.0));
        assert_eq!(inner, Rect::new(90.0, 90.0, 120.0, 120.0));
    }

    #[test]
    fn test_edges() {
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(rect.right(), 40.0);
        assert_eq!(rect.bottom(), 60.0);
        assert_eq!(rect.origin(), Point::new(10.0, 20.0));
        assert_eq!(rect.size(), Size::new(30.0, 40.0));
    }

    #[test]
    fn test_translated_keeps_size() {
        let rect = Rect::new(10.0, 10.0, 50.0, 50.0).translated(Translation::new(-5.0, 7.5));
        assert_eq!(rect, Rect::new(5.0, 17.5, 50.0, 50.0));
    }

    #[test]
    fn test_contains() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(outer.contains_point(Point::new(100.0, 0.0)));
        assert!(!outer.contains_point(Point::new(100.1, 0.0)));
        assert!(outer.contains_rect(&Rect::new(0.0, 0.0, 100.0, 100.0)));
        assert!(outer.contains_rect(&Rect::new(0.0, 0.0, 100.0 + 1e-9, 100.0)));
        assert!(!outer.contains_rect(&Rect::new(-1.0, 0.0, 50.0, 50.0)));
        assert!(!outer.contains_rect(&Rect::new(60.0, 60.0, 50.0, 50.0)));
    }
}
