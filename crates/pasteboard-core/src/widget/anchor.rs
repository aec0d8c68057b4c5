//! Anchor definitions for the transform widget.

use kurbo::{Point, Rect, Vec2};

/// Anchor size in screen pixels.
pub const HANDLE_SIZE: f64 = 10.0;
/// Half-extent of the anchor hit square in screen pixels.
pub const HANDLE_HIT_TOLERANCE: f64 = 8.0;

/// A draggable anchor of the transform widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anchor {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    MiddleLeft,
    MiddleRight,
}

impl Anchor {
    pub const CORNERS: [Anchor; 4] = [
        Anchor::TopLeft,
        Anchor::TopRight,
        Anchor::BottomLeft,
        Anchor::BottomRight,
    ];

    pub const HORIZONTAL: [Anchor; 2] = [Anchor::MiddleLeft, Anchor::MiddleRight];

    /// Position of this anchor on a box.
    pub fn point_on(self, rect: Rect) -> Point {
        let mid_y = (rect.y0 + rect.y1) / 2.0;
        match self {
            Anchor::TopLeft => Point::new(rect.x0, rect.y0),
            Anchor::TopRight => Point::new(rect.x1, rect.y0),
            Anchor::BottomLeft => Point::new(rect.x0, rect.y1),
            Anchor::BottomRight => Point::new(rect.x1, rect.y1),
            Anchor::MiddleLeft => Point::new(rect.x0, mid_y),
            Anchor::MiddleRight => Point::new(rect.x1, mid_y),
        }
    }

    /// Move the edges this anchor controls by `delta`, leaving the others put.
    ///
    /// The result is not normalized: dragging past the opposite edge gives a
    /// negative width or height.
    pub fn drag_box(self, rect: Rect, delta: Vec2) -> Rect {
        let Rect { x0, y0, x1, y1 } = rect;
        match self {
            Anchor::TopLeft => Rect::new(x0 + delta.x, y0 + delta.y, x1, y1),
            Anchor::TopRight => Rect::new(x0, y0 + delta.y, x1 + delta.x, y1),
            Anchor::BottomLeft => Rect::new(x0 + delta.x, y0, x1, y1 + delta.y),
            Anchor::BottomRight => Rect::new(x0, y0, x1 + delta.x, y1 + delta.y),
            Anchor::MiddleLeft => Rect::new(x0 + delta.x, y0, x1, y1),
            Anchor::MiddleRight => Rect::new(x0, y0, x1 + delta.x, y1),
        }
    }
}

/// An anchor placed on screen.
#[derive(Debug, Clone, Copy)]
pub struct Handle {
    pub anchor: Anchor,
    /// Center in screen coordinates.
    pub position: Point,
}

impl Handle {
    pub fn new(anchor: Anchor, position: Point) -> Self {
        Self { anchor, position }
    }

    /// Square hit test in screen coordinates.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        (point.x - self.position.x).abs() <= tolerance
            && (point.y - self.position.y).abs() <= tolerance
    }

    /// Square drawn for this handle.
    pub fn rect(&self) -> Rect {
        Rect::from_center_size(self.position, (HANDLE_SIZE, HANDLE_SIZE))
    }
}
