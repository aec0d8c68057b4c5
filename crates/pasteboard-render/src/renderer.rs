//! Renderer trait abstraction.

use kurbo::{Rect, Size};
use pasteboard_core::canvas::Canvas;
use pasteboard_core::shapes::ShapeId;
use pasteboard_core::widget::HANDLE_SIZE;
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Initialization failed: {0}")]
    InitFailed(String),
}

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The canvas to render.
    pub canvas: &'a Canvas,
    /// Viewport size in physical pixels.
    pub viewport_size: Size,
    /// Device pixel ratio (for HiDPI).
    pub scale_factor: f64,
    pub background_color: Color,
    /// Transformer border and anchor stroke color.
    pub selection_color: Color,
    /// Rubber band in world coordinates.
    pub selection_rect: Option<Rect>,
    /// Text node hidden behind the inline editor.
    pub editing_shape_id: Option<ShapeId>,
    /// Anchor square side in screen pixels.
    pub handle_size: f64,
}

impl<'a> RenderContext<'a> {
    pub fn new(canvas: &'a Canvas, viewport_size: Size) -> Self {
        Self {
            canvas,
            viewport_size,
            scale_factor: 1.0,
            background_color: Color::WHITE,
            selection_color: Color::from_rgba8(59, 130, 246, 255),
            selection_rect: None,
            editing_shape_id: None,
            handle_size: HANDLE_SIZE,
        }
    }

    /// Set the scale factor for HiDPI.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    pub fn with_selection_color(mut self, color: Color) -> Self {
        self.selection_color = color;
        self
    }

    pub fn with_selection_rect(mut self, rect: Option<Rect>) -> Self {
        self.selection_rect = rect;
        self
    }

    /// Set the shape being edited (skipped by `build_scene`).
    pub fn with_editing_shape(mut self, shape_id: Option<ShapeId>) -> Self {
        self.editing_shape_id = shape_id;
        self
    }

    pub fn with_handle_size(mut self, size: f64) -> Self {
        self.handle_size = size;
        self
    }
}

/// Trait for rendering backends.
pub trait Renderer {
    /// Build the drawing commands for a frame.
    fn build_scene(&mut self, ctx: &RenderContext);
}
