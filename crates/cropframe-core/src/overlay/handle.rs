//! Handle regions of the crop frame.
//!
//! The frame is split into a 3×3 grid at one and two thirds of its width and
//! height. A gesture that starts in a corner cell resizes the frame; a
//! gesture that starts in any of the five cells touching the middle row or
//! column moves it.

use serde::{Deserialize, Serialize};

use crate::geometry::{CropRect, Point};

/// Grid cell a gesture started in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HandleRegion {
    /// Outside the frame; the gesture is ignored.
    #[default]
    None,
    TopLeft,
    Top,
    TopRight,
    Left,
    Center,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
}

/// What a gesture in a region does to the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleAction {
    Ignore,
    Move,
    Resize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Band {
    Start,
    Middle,
    End,
}

impl Band {
    fn from_fraction(fraction: f64) -> Self {
        if fraction < 1.0 / 3.0 {
            Band::Start
        } else if fraction < 2.0 / 3.0 {
            Band::Middle
        } else {
            Band::End
        }
    }
}

impl HandleRegion {
    /// All nine grid cells, row by row.
    pub const GRID: [HandleRegion; 9] = [
        HandleRegion::TopLeft,
        HandleRegion::Top,
        HandleRegion::TopRight,
        HandleRegion::Left,
        HandleRegion::Center,
        HandleRegion::Right,
        HandleRegion::BottomLeft,
        HandleRegion::Bottom,
        HandleRegion::BottomRight,
    ];

    /// camelCase name, matching the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            HandleRegion::None => "none",
            HandleRegion::TopLeft => "topLeft",
            HandleRegion::Top => "top",
            HandleRegion::TopRight => "topRight",
            HandleRegion::Left => "left",
            HandleRegion::Center => "center",
            HandleRegion::Right => "right",
            HandleRegion::BottomLeft => "bottomLeft",
            HandleRegion::Bottom => "bottom",
            HandleRegion::BottomRight => "bottomRight",
        }
    }

    /// Classify a pointer-down at `point` against the current frame.
    ///
    /// Points outside the frame, and frames without area, yield
    /// [`HandleRegion::None`].
    pub fn classify(rect: &CropRect, point: Point) -> Self {
        if rect.width <= 0.0 || rect.height <= 0.0 || !rect.contains_point(point) {
            return HandleRegion::None;
        }

        let row = Band::from_fraction((point.y - rect.y) / rect.height);
        let column = Band::from_fraction((point.x - rect.x) / rect.width);

        match (row, column) {
            (Band::Start, Band::Start) => HandleRegion::TopLeft,
            (Band::Start, Band::Middle) => HandleRegion::Top,
            (Band::Start, Band::End) => HandleRegion::TopRight,
            (Band::Middle, Band::Start) => HandleRegion::Left,
            (Band::Middle, Band::Middle) => HandleRegion::Center,
            (Band::Middle, Band::End) => HandleRegion::Right,
            (Band::End, Band::Start) => HandleRegion::BottomLeft,
            (Band::End, Band::Middle) => HandleRegion::Bottom,
            (Band::End, Band::End) => HandleRegion::BottomRight,
        }
    }

    pub fn action(self) -> HandleAction {
        match self {
            HandleRegion::None => HandleAction::Ignore,
            HandleRegion::TopLeft
            | HandleRegion::TopRight
            | HandleRegion::BottomLeft
            | HandleRegion::BottomRight => HandleAction::Resize,
            HandleRegion::Top
            | HandleRegion::Left
            | HandleRegion::Center
            | HandleRegion::Right
            | HandleRegion::Bottom => HandleAction::Move,
        }
    }

    /// Corner on the left edge of the frame.
    pub fn is_left(self) -> bool {
        matches!(self, HandleRegion::TopLeft | HandleRegion::BottomLeft)
    }

    /// Corner on the top edge of the frame.
    pub fn is_top(self) -> bool {
        matches!(self, HandleRegion::TopLeft | HandleRegion::TopRight)
    }

    /// Sign applied to raw translations so that dragging a corner outward
    /// grows the frame: `-1` on the left/top side, `+1` otherwise.
    pub(crate) fn growth_signs(self) -> (f64, f64) {
        let sx = if self.is_left() { -1.0 } else { 1.0 };
        let sy = if self.is_top() { -1.0 } else { 1.0 };
        (sx, sy)
    }
}
