//! Font size and color controls for selected text nodes.

use crate::canvas::Canvas;
use crate::shapes::{SerializableColor, ShapeId};
use crate::text_measure::TextMeasure;
use kurbo::Point;

/// Sizes offered by the font size control.
pub const FONT_SIZES: [u32; 11] = [12, 14, 16, 18, 20, 24, 28, 32, 36, 48, 64];

/// Vertical gap between a text node and its style panel, in screen pixels.
pub const PANEL_GAP: f64 = 1.0;

/// Values shown by the floating style panel.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleControls {
    pub shape_id: ShapeId,
    pub font_size: f64,
    pub color: SerializableColor,
    /// Top-left of the panel in screen pixels.
    pub anchor: Point,
}

impl StyleControls {
    /// Panel state for the canvas, shown only for a single visible text node.
    pub fn for_selection(canvas: &Canvas) -> Option<Self> {
        let text = canvas.single_selected_text()?;
        if !text.attrs.visible {
            return None;
        }
        let bounds = canvas.camera.transform().transform_rect_bbox(text.attrs.bounds());
        Some(Self {
            shape_id: canvas.selection().single()?,
            font_size: text.font_size,
            color: text.fill,
            anchor: Point::new(bounds.x0, bounds.y1 + PANEL_GAP),
        })
    }

    /// The offered size closest to the node's size.
    pub fn nearest_size(&self) -> u32 {
        FONT_SIZES
            .iter()
            .copied()
            .min_by(|a, b| {
                let da = (*a as f64 - self.font_size).abs();
                let db = (*b as f64 - self.font_size).abs();
                da.total_cmp(&db)
            })
            .unwrap_or(FONT_SIZES[4])
    }
}

impl Canvas {
    /// Set the font size of every selected text node and refit heights.
    ///
    /// Returns how many nodes changed.
    pub fn apply_font_size(&mut self, font_size: f64, measure: &mut dyn TextMeasure) -> usize {
        if font_size.is_nan() || font_size <= 0.0 {
            return 0;
        }
        let ids = self.selection().ids().to_vec();
        let mut changed = 0;
        for id in ids {
            if let Some(text) = self.document.get_shape_mut(id).and_then(|s| s.as_text_mut()) {
                text.font_size = font_size;
                measure.fit_height(text);
                changed += 1;
            }
        }
        changed
    }

    /// Set the fill of every selected text node. Returns how many nodes changed.
    pub fn apply_fill(&mut self, color: SerializableColor) -> usize {
        let ids = self.selection().ids().to_vec();
        let mut changed = 0;
        for id in ids {
            if let Some(text) = self.document.get_shape_mut(id).and_then(|s| s.as_text_mut()) {
                text.fill = color;
                changed += 1;
            }
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Image, Shape, Text, png_bytes};
    use crate::text_measure::ApproximateMeasure;

    #[test]
    fn test_panel_only_for_single_text() {
        let mut canvas = Canvas::new();
        let text = canvas.add_shape(Shape::Text(Text::new(Point::new(10.0, 20.0), "hi")));
        let image = canvas.add_shape(Shape::Image(
            Image::from_bytes(Point::ZERO, png_bytes(8, 8)).unwrap(),
        ));

        assert!(StyleControls::for_selection(&canvas).is_none());
        canvas.set_selection([image]);
        assert!(StyleControls::for_selection(&canvas).is_none());
        canvas.set_selection([text, image]);
        assert!(StyleControls::for_selection(&canvas).is_none());

        canvas.set_selection([text]);
        let controls = StyleControls::for_selection(&canvas).unwrap();
        assert_eq!(controls.shape_id, text);
        assert_eq!(controls.color.to_hex(), "#000000");
        assert_eq!(controls.nearest_size(), 20);
        // One line of 20 px below y = 20, plus the gap
        assert_eq!(controls.anchor, Point::new(10.0, 41.0));
    }

    #[test]
    fn test_panel_position_follows_camera() {
        let mut canvas = Canvas::new();
        let text = canvas.add_shape(Shape::Text(Text::new(Point::new(10.0, 20.0), "hi")));
        canvas.set_selection([text]);
        canvas.camera.zoom = 2.0;
        let controls = StyleControls::for_selection(&canvas).unwrap();
        assert_eq!(controls.anchor, Point::new(20.0, 81.0));
    }

    #[test]
    fn test_panel_hidden_while_node_hidden() {
        let mut canvas = Canvas::new();
        let text = canvas.add_shape(Shape::Text(Text::new(Point::ZERO, "hi")));
        canvas.set_selection([text]);
        canvas.document.get_shape_mut(text).unwrap().attrs_mut().visible = false;
        assert!(StyleControls::for_selection(&canvas).is_none());
    }

    #[test]
    fn test_apply_to_all_selected_text_nodes() {
        let mut canvas = Canvas::new();
        let a = canvas.add_shape(Shape::Text(Text::new(Point::ZERO, "a")));
        let b = canvas.add_shape(Shape::Text(Text::new(Point::new(0.0, 50.0), "b")));
        let c = canvas.add_shape(Shape::Text(Text::new(Point::new(0.0, 90.0), "c")));
        let img = canvas.add_shape(Shape::Image(
            Image::from_bytes(Point::ZERO, png_bytes(8, 8)).unwrap(),
        ));
        canvas.set_selection([a, b, img]);

        let mut measure = ApproximateMeasure::default();
        assert_eq!(canvas.apply_font_size(32.0, &mut measure), 2);
        assert_eq!(canvas.apply_fill(SerializableColor::new(255, 0, 0, 255)), 2);

        for id in [a, b] {
            let text = canvas.document.get_shape(id).unwrap().as_text().unwrap();
            assert!((text.font_size - 32.0).abs() < f64::EPSILON);
            assert!((text.attrs.height - 32.0).abs() < f64::EPSILON);
            assert_eq!(text.fill.to_hex(), "#ff0000");
        }
        let untouched = canvas.document.get_shape(c).unwrap().as_text().unwrap();
        assert!((untouched.font_size - 20.0).abs() < f64::EPSILON);
        assert_eq!(canvas.apply_font_size(0.0, &mut measure), 0);
    }
}
