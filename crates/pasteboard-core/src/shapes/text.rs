//! Text shape.

use super::{NodeAttrs, SerializableColor, ShapeId, ShapeTrait};
use kurbo::Point;
use uuid::Uuid;

/// Horizontal alignment of lines inside the text box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// A text box. Content wraps at `attrs.width`.
#[derive(Debug, Clone)]
pub struct Text {
    pub(crate) id: ShapeId,
    pub attrs: NodeAttrs,
    pub content: String,
    /// Font size in pixels.
    pub font_size: f64,
    pub fill: SerializableColor,
    pub align: TextAlign,
    /// Line height as a multiple of the font size.
    pub line_height: f64,
    pub font_family: String,
}

impl Text {
    pub const DEFAULT_FONT_SIZE: f64 = 20.0;
    pub const DEFAULT_WIDTH: f64 = 200.0;
    pub const DEFAULT_FONT_FAMILY: &'static str = "Arial";
    pub const PLACEHOLDER: &'static str = "New Text";

    /// Create a text box with default styling. Height starts at one line.
    pub fn new(position: Point, content: impl Into<String>) -> Self {
        let height = Self::DEFAULT_FONT_SIZE;
        Self {
            id: Uuid::new_v4(),
            attrs: NodeAttrs::new(position, Self::DEFAULT_WIDTH, height),
            content: content.into(),
            font_size: Self::DEFAULT_FONT_SIZE,
            fill: SerializableColor::black(),
            align: TextAlign::default(),
            line_height: 1.0,
            font_family: Self::DEFAULT_FONT_FAMILY.to_string(),
        }
    }

    /// The box created by double-clicking empty canvas.
    pub fn placeholder(position: Point) -> Self {
        Self::new(position, Self::PLACEHOLDER)
    }

    /// Height of one line in unscaled units.
    pub fn line_px(&self) -> f64 {
        self.font_size * self.line_height
    }
}

impl ShapeTrait for Text {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn attrs(&self) -> &NodeAttrs {
        &self.attrs
    }

    fn attrs_mut(&mut self) -> &mut NodeAttrs {
        &mut self.attrs
    }
}
