//! Drawable nodes of the object layer.

mod image;
mod text;

pub use image::{Image, ImageFormat};
pub use text::{Text, TextAlign};

#[cfg(test)]
pub(crate) use image::tests::png_bytes;

use kurbo::{Point, Rect, Size, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name tag carried by user content. Only tagged nodes are selectable.
pub const OBJECT_NAME: &str = "object";

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    /// Parse `#rgb` or `#rrggbb` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        let digit = |i: usize| u8::from_str_radix(hex.get(i..i + 1)?, 16).ok();
        match hex.len() {
            3 => Some(Self::new(
                digit(0)? * 17,
                digit(1)? * 17,
                digit(2)? * 17,
                255,
            )),
            6 => {
                let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
                Some(Self::new(byte(0)?, byte(2)?, byte(4)?, 255))
            }
            _ => None,
        }
    }

    /// Lowercase `#rrggbb`; alpha is dropped.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Drop shadow drawn behind a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropShadow {
    pub color: SerializableColor,
    /// Blur radius in world units.
    pub blur: f64,
    pub opacity: f64,
    pub offset: Vec2,
}

impl DropShadow {
    /// The highlight applied to selected nodes.
    pub fn highlight() -> Self {
        Self {
            color: SerializableColor::black(),
            blur: 10.0,
            opacity: 0.6,
            offset: Vec2::new(5.0, 5.0),
        }
    }

    /// Shadow color with opacity folded into alpha.
    pub fn effective_color(&self) -> Color {
        let alpha = (self.color.a as f64 * self.opacity.clamp(0.0, 1.0)).round() as u8;
        Color::from_rgba8(self.color.r, self.color.g, self.color.b, alpha)
    }
}

/// Geometry and flags shared by every node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeAttrs {
    /// Top-left corner in world coordinates.
    pub position: Point,
    /// Unscaled width.
    pub width: f64,
    /// Unscaled height.
    pub height: f64,
    pub scale: Vec2,
    pub draggable: bool,
    pub name: String,
    pub shadow: Option<DropShadow>,
    /// Hidden nodes are skipped by rendering but still hit-testable.
    pub visible: bool,
}

impl NodeAttrs {
    pub fn new(position: Point, width: f64, height: f64) -> Self {
        Self {
            position,
            width,
            height,
            scale: Vec2::new(1.0, 1.0),
            draggable: true,
            name: OBJECT_NAME.to_string(),
            shadow: None,
            visible: true,
        }
    }

    /// Size after applying scale.
    pub fn scaled_size(&self) -> Size {
        Size::new(self.width * self.scale.x, self.height * self.scale.y)
    }

    /// Axis-aligned bounds in world coordinates.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.scaled_size())
    }
}

/// Common trait for all shapes.
pub trait ShapeTrait {
    fn id(&self) -> ShapeId;

    fn attrs(&self) -> &NodeAttrs;

    fn attrs_mut(&mut self) -> &mut NodeAttrs;

    /// Bounding box in world coordinates.
    fn bounds(&self) -> Rect {
        self.attrs().bounds()
    }

    /// Check if a point (in world coordinates) hits this shape.
    fn hit_test(&self, point: Point) -> bool {
        self.bounds().contains(point)
    }
}

/// A node on the object layer.
#[derive(Debug, Clone)]
pub enum Shape {
    Image(Image),
    Text(Text),
}

impl Shape {
    pub fn id(&self) -> ShapeId {
        match self {
            Shape::Image(s) => s.id(),
            Shape::Text(s) => s.id(),
        }
    }

    pub fn attrs(&self) -> &NodeAttrs {
        match self {
            Shape::Image(s) => s.attrs(),
            Shape::Text(s) => s.attrs(),
        }
    }

    pub fn attrs_mut(&mut self) -> &mut NodeAttrs {
        match self {
            Shape::Image(s) => s.attrs_mut(),
            Shape::Text(s) => s.attrs_mut(),
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Image(s) => s.bounds(),
            Shape::Text(s) => s.bounds(),
        }
    }

    pub fn hit_test(&self, point: Point) -> bool {
        match self {
            Shape::Image(s) => s.hit_test(point),
            Shape::Text(s) => s.hit_test(point),
        }
    }

    /// Bounding-box intersection with a selection rectangle. Touching edges count.
    pub fn intersects_rect(&self, rect: Rect) -> bool {
        let bounds = self.bounds();
        bounds.x0 <= rect.x1 && rect.x0 <= bounds.x1 && bounds.y0 <= rect.y1 && rect.y0 <= bounds.y1
    }

    /// Whether the node is tagged as user content.
    pub fn is_object(&self) -> bool {
        self.attrs().name == OBJECT_NAME
    }

    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Shape::Text(t) => Some(t),
            Shape::Image(_) => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut Text> {
        match self {
            Shape::Text(t) => Some(t),
            Shape::Image(_) => None,
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        assert_eq!(SerializableColor::from_hex("#000000"), Some(SerializableColor::black()));
        assert_eq!(
            SerializableColor::from_hex("ff8000"),
            Some(SerializableColor::new(255, 128, 0, 255))
        );
        assert_eq!(
            SerializableColor::from_hex("#fff"),
            Some(SerializableColor::white())
        );
        assert_eq!(SerializableColor::from_hex("#12345"), None);
        assert_eq!(SerializableColor::from_hex("#gg0000"), None);
        assert_eq!(SerializableColor::new(18, 52, 86, 255).to_hex(), "#123456");
    }

    #[test]
    fn test_highlight_shadow() {
        let shadow = DropShadow::highlight();
        assert!((shadow.blur - 10.0).abs() < f64::EPSILON);
        assert!((shadow.opacity - 0.6).abs() < f64::EPSILON);
        assert_eq!(shadow.offset, Vec2::new(5.0, 5.0));
        assert_eq!(shadow.effective_color().to_rgba8().a, 153);
    }

    #[test]
    fn test_bounds_include_scale() {
        let mut attrs = NodeAttrs::new(Point::new(10.0, 20.0), 100.0, 50.0);
        attrs.scale = Vec2::new(2.0, 0.5);
        assert_eq!(attrs.bounds(), Rect::new(10.0, 20.0, 210.0, 45.0));
    }

    #[test]
    fn test_intersects_rect_touching_edge() {
        let text = Shape::Text(Text::new(Point::new(0.0, 0.0), "a"));
        let bounds = text.bounds();
        assert!(text.intersects_rect(Rect::new(bounds.x1, 0.0, bounds.x1 + 10.0, 10.0)));
        assert!(!text.intersects_rect(Rect::new(bounds.x1 + 0.5, 0.0, bounds.x1 + 10.0, 10.0)));
    }
}
