//! Selection set and the drag state that moves selected nodes.

use crate::shapes::ShapeId;
use kurbo::{Point, Vec2};
use std::collections::HashMap;

/// Ordered, duplicate-free set of selected node ids.
///
/// Holds ids only; the document owns the nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<ShapeId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &[ShapeId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.ids.contains(&id)
    }

    /// The only selected id, if exactly one node is selected.
    pub fn single(&self) -> Option<ShapeId> {
        match self.ids.as_slice() {
            [id] => Some(*id),
            _ => None,
        }
    }

    /// Replace the selection, keeping first occurrence order.
    pub fn set(&mut self, ids: impl IntoIterator<Item = ShapeId>) {
        self.ids.clear();
        for id in ids {
            if !self.ids.contains(&id) {
                self.ids.push(id);
            }
        }
    }

    pub fn insert(&mut self, id: ShapeId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    pub fn remove(&mut self, id: ShapeId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|&selected| selected != id);
        self.ids.len() != before
    }

    /// Add if absent, remove if present.
    pub fn toggle(&mut self, id: ShapeId) {
        if !self.remove(id) {
            self.ids.push(id);
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn retain(&mut self, f: impl FnMut(&ShapeId) -> bool) {
        self.ids.retain(f);
    }

    /// Apply a click. `None` is the empty canvas.
    ///
    /// Returns whether the selection changed.
    pub fn apply_click(&mut self, target: Option<ShapeId>, toggle: bool) -> bool {
        let before = self.ids.clone();
        match target {
            None => self.clear(),
            Some(id) if toggle => self.toggle(id),
            Some(id) => self.set([id]),
        }
        self.ids != before
    }
}

/// State for dragging one or more nodes.
#[derive(Debug, Clone)]
pub struct MultiMoveState {
    /// Starting point of the drag in world coordinates.
    pub start_point: Point,
    /// Current point of the drag in world coordinates.
    pub current_point: Point,
    /// Node positions when the drag began.
    pub original_positions: HashMap<ShapeId, Point>,
    /// Set once the pointer has travelled past the drag threshold.
    pub moved: bool,
}

impl MultiMoveState {
    pub fn new(start_point: Point, original_positions: HashMap<ShapeId, Point>) -> Self {
        Self {
            start_point,
            current_point: start_point,
            original_positions,
            moved: false,
        }
    }

    /// Get the drag delta.
    pub fn delta(&self) -> Vec2 {
        self.current_point - self.start_point
    }
}
