//! Transformer: anchors and bounding-box constraints for the selection.

use super::anchor::{Anchor, HANDLE_HIT_TOLERANCE, Handle};
use crate::camera::Camera;
use crate::canvas::CanvasDocument;
use crate::shapes::{NodeAttrs, Shape, ShapeId};
use kurbo::{Point, Rect, Vec2};
use std::collections::HashMap;

/// Boxes narrower or shorter than this are rejected during resize.
pub const MIN_BOX_SIZE: f64 = 10.0;

/// How a proposed bounding box is adjusted while resizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundBoxPolicy {
    /// Accept the box as dragged.
    #[default]
    Free,
    /// Keep the original top edge and height; only the width may change.
    LockHeight,
}

impl BoundBoxPolicy {
    pub fn apply(self, old: Rect, new: Rect) -> Rect {
        match self {
            BoundBoxPolicy::Free => new,
            BoundBoxPolicy::LockHeight => Rect::new(new.x0, old.y0, new.x1, old.y1),
        }
    }
}

/// The transform widget.
#[derive(Debug, Clone)]
pub struct Transformer {
    nodes: Vec<ShapeId>,
    anchors: Vec<Anchor>,
    policy: BoundBoxPolicy,
    visible: bool,
}

impl Default for Transformer {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            anchors: Anchor::CORNERS.to_vec(),
            policy: BoundBoxPolicy::Free,
            visible: true,
        }
    }
}

impl Transformer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind to exactly these nodes and pick anchors for them.
    ///
    /// A lone text node gets horizontal anchors with a locked height;
    /// anything else gets the four corners.
    pub fn bind(&mut self, shapes: &[&Shape]) {
        self.nodes = shapes.iter().map(|s| s.id()).collect();
        match shapes {
            [Shape::Text(_)] => {
                self.anchors = Anchor::HORIZONTAL.to_vec();
                self.policy = BoundBoxPolicy::LockHeight;
            }
            _ => {
                self.anchors = Anchor::CORNERS.to_vec();
                self.policy = BoundBoxPolicy::Free;
            }
        }
    }

    pub fn nodes(&self) -> &[ShapeId] {
        &self.nodes
    }

    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    pub fn policy(&self) -> BoundBoxPolicy {
        self.policy
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Visible and bound to at least one node.
    pub fn is_active(&self) -> bool {
        self.visible && !self.nodes.is_empty()
    }

    /// Union of the bound nodes' bounds in world coordinates.
    pub fn bounds(&self, document: &CanvasDocument) -> Option<Rect> {
        document.bounds_of(&self.nodes)
    }

    /// Bounds in screen coordinates.
    pub fn screen_bounds(&self, document: &CanvasDocument, camera: &Camera) -> Option<Rect> {
        self.bounds(document)
            .map(|rect| camera.transform().transform_rect_bbox(rect))
    }

    /// Anchors placed on screen. Empty when inactive.
    pub fn handles(&self, document: &CanvasDocument, camera: &Camera) -> Vec<Handle> {
        if !self.is_active() {
            return Vec::new();
        }
        let Some(rect) = self.screen_bounds(document, camera) else {
            return Vec::new();
        };
        self.anchors
            .iter()
            .map(|&anchor| Handle::new(anchor, anchor.point_on(rect)))
            .collect()
    }

    /// Anchor under a screen point, if any.
    pub fn hit_test(&self, document: &CanvasDocument, camera: &Camera, screen_point: Point) -> Option<Anchor> {
        self.handles(document, camera)
            .into_iter()
            .find(|h| h.hit_test(screen_point, HANDLE_HIT_TOLERANCE))
            .map(|h| h.anchor)
    }

    /// Constrain a proposed box, falling back to `old` when it is too small.
    pub fn constrain(&self, old: Rect, new: Rect) -> Rect {
        let new = self.policy.apply(old, new);
        let too_small = new.width() < MIN_BOX_SIZE
            || (self.policy == BoundBoxPolicy::Free && new.height() < MIN_BOX_SIZE);
        if too_small { old } else { new }
    }

    /// Start dragging `anchor` at `start_point` (world coordinates).
    pub fn begin_resize(&self, document: &CanvasDocument, anchor: Anchor, start_point: Point) -> Option<ResizeState> {
        let original_box = self.bounds(document)?;
        let originals = self
            .nodes
            .iter()
            .filter_map(|&id| document.get_shape(id).map(|s| (id, s.attrs().clone())))
            .collect();
        Some(ResizeState {
            anchor,
            start_point,
            current_point: start_point,
            original_box,
            current_box: original_box,
            originals,
        })
    }

    /// Apply the drag at `point` to the bound nodes.
    pub fn resize(&self, document: &mut CanvasDocument, state: &mut ResizeState, point: Point) {
        state.current_point = point;
        let proposed = state.anchor.drag_box(state.original_box, state.delta());
        state.current_box = self.constrain(state.current_box, proposed);

        let from = state.original_box;
        let to = state.current_box;
        let sx = to.width() / from.width().max(f64::EPSILON);
        let sy = to.height() / from.height().max(f64::EPSILON);

        for (&id, original) in &state.originals {
            let Some(shape) = document.get_shape_mut(id) else {
                continue;
            };
            let position = Point::new(
                to.x0 + (original.position.x - from.x0) * sx,
                to.y0 + (original.position.y - from.y0) * sy,
            );
            match (shape, self.policy) {
                (Shape::Text(text), BoundBoxPolicy::LockHeight) => {
                    // Width changes re-wrap the text instead of stretching glyphs
                    text.attrs.position = position;
                    text.attrs.width = original.width * sx;
                }
                (shape, _) => {
                    let attrs = shape.attrs_mut();
                    attrs.position = position;
                    attrs.scale = Vec2::new(original.scale.x * sx, original.scale.y * sy);
                }
            }
        }
    }
}

/// State of an active anchor drag.
#[derive(Debug, Clone)]
pub struct ResizeState {
    pub anchor: Anchor,
    /// World point where the drag started.
    pub start_point: Point,
    pub current_point: Point,
    /// Transformer box when the drag started.
    pub original_box: Rect,
    /// Last accepted box.
    pub current_box: Rect,
    /// Node attributes when the drag started.
    pub originals: HashMap<ShapeId, NodeAttrs>,
}

impl ResizeState {
    pub fn delta(&self) -> Vec2 {
        self.current_point - self.start_point
    }
}
