//! Object layer and canvas state.

use crate::camera::Camera;
use crate::selection::Selection;
use crate::shapes::{DropShadow, Shape, ShapeId, Text};
use crate::widget::Transformer;
use kurbo::{Point, Rect, Size};
use std::collections::HashMap;

/// The object layer: every user-created node, in z order.
#[derive(Debug, Clone, Default)]
pub struct CanvasDocument {
    /// All shapes in the document, keyed by ID.
    pub shapes: HashMap<ShapeId, Shape>,
    /// Z-order of shapes (back to front).
    pub z_order: Vec<ShapeId>,
}

impl CanvasDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a shape on top of the others.
    pub fn add_shape(&mut self, shape: Shape) -> ShapeId {
        let id = shape.id();
        self.z_order.push(id);
        self.shapes.insert(id, shape);
        id
    }

    pub fn remove_shape(&mut self, id: ShapeId) -> Option<Shape> {
        self.z_order.retain(|&shape_id| shape_id != id);
        self.shapes.remove(&id)
    }

    pub fn get_shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(&id)
    }

    pub fn get_shape_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.get_mut(&id)
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.shapes.contains_key(&id)
    }

    /// Get shapes in z-order (back to front).
    pub fn shapes_ordered(&self) -> impl Iterator<Item = &Shape> {
        self.z_order.iter().filter_map(|id| self.shapes.get(id))
    }

    /// Shapes under a world point, front to back.
    pub fn shapes_at_point(&self, point: Point) -> Vec<ShapeId> {
        self.z_order
            .iter()
            .rev()
            .filter_map(|&id| {
                self.shapes
                    .get(&id)
                    .filter(|s| s.hit_test(point))
                    .map(|_| id)
            })
            .collect()
    }

    /// Topmost selectable node under a world point.
    pub fn object_at_point(&self, point: Point) -> Option<ShapeId> {
        self.shapes_at_point(point)
            .into_iter()
            .find(|id| self.shapes.get(id).is_some_and(Shape::is_object))
    }

    /// Selectable nodes whose bounding box intersects `rect`, back to front.
    pub fn shapes_in_rect(&self, rect: Rect) -> Vec<ShapeId> {
        self.z_order
            .iter()
            .filter_map(|&id| {
                self.shapes
                    .get(&id)
                    .filter(|s| s.is_object() && s.intersects_rect(rect))
                    .map(|_| id)
            })
            .collect()
    }

    /// Union of the bounds of the given shapes.
    pub fn bounds_of(&self, ids: &[ShapeId]) -> Option<Rect> {
        ids.iter()
            .filter_map(|id| self.shapes.get(id))
            .map(Shape::bounds)
            .reduce(|a, b| a.union(b))
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }
}

/// Canvas state: the object layer plus view, selection and transform widget.
#[derive(Debug, Clone)]
pub struct Canvas {
    pub document: CanvasDocument,
    pub camera: Camera,
    selection: Selection,
    pub transformer: Transformer,
    /// Stage size in screen pixels.
    pub viewport_size: Size,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    pub fn new() -> Self {
        Self {
            document: CanvasDocument::new(),
            camera: Camera::new(),
            selection: Selection::new(),
            transformer: Transformer::new(),
            viewport_size: Size::new(800.0, 600.0),
        }
    }

    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        self.viewport_size = Size::new(width, height);
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn is_selected(&self, id: ShapeId) -> bool {
        self.selection.contains(id)
    }

    /// Selected shapes in selection order.
    pub fn selected_shapes(&self) -> impl Iterator<Item = &Shape> {
        self.selection
            .ids()
            .iter()
            .filter_map(|&id| self.document.get_shape(id))
    }

    /// The selected text node when it is the only selected node.
    pub fn single_selected_text(&self) -> Option<&Text> {
        self.selection
            .single()
            .and_then(|id| self.document.get_shape(id))
            .and_then(Shape::as_text)
    }

    /// Replace the selection with `ids`.
    pub fn set_selection(&mut self, ids: impl IntoIterator<Item = ShapeId>) {
        self.selection.set(ids);
        self.sync_selection();
    }

    /// Apply a click: `None` is the empty canvas, `toggle` is shift/ctrl/meta.
    pub fn apply_click(&mut self, target: Option<ShapeId>, toggle: bool) {
        if self.selection.apply_click(target, toggle) {
            self.sync_selection();
        }
    }

    pub fn clear_selection(&mut self) {
        self.set_selection([]);
    }

    /// Add a shape on top of the object layer.
    pub fn add_shape(&mut self, shape: Shape) -> ShapeId {
        self.document.add_shape(shape)
    }

    /// Remove a single shape, dropping it from the selection.
    pub fn remove_shape(&mut self, id: ShapeId) -> Option<Shape> {
        let removed = self.document.remove_shape(id);
        if self.selection.remove(id) {
            self.sync_selection();
        }
        removed
    }

    /// Destroy every selected node. Returns the removed nodes.
    pub fn delete_selected(&mut self) -> Vec<Shape> {
        if self.selection.is_empty() {
            return Vec::new();
        }
        let ids = self.selection.ids().to_vec();
        let removed: Vec<Shape> = ids
            .into_iter()
            .filter_map(|id| self.document.remove_shape(id))
            .collect();
        self.selection.clear();
        self.sync_selection();
        log::debug!("Deleted {} node(s)", removed.len());
        removed
    }

    /// Re-apply highlights and rebind the transformer to the selection.
    fn sync_selection(&mut self) {
        let document = &self.document;
        self.selection
            .retain(|&id| document.get_shape(id).is_some_and(Shape::is_object));

        for shape in self.document.shapes.values_mut() {
            shape.attrs_mut().shadow = None;
        }
        for &id in self.selection.ids() {
            if let Some(shape) = self.document.shapes.get_mut(&id) {
                shape.attrs_mut().shadow = Some(DropShadow::highlight());
            }
        }

        let selected: Vec<&Shape> = self
            .selection
            .ids()
            .iter()
            .filter_map(|&id| self.document.get_shape(id))
            .collect();
        self.transformer.bind(&selected);
    }
}
