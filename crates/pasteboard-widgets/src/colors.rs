//! Text color palette, swatches and CSS hex conversion.

use egui::{Color32, CornerRadius, CursorIcon, Rect, Sense, Stroke, StrokeKind, Ui, Vec2, vec2};

use crate::{sizing, theme};

/// Quick-pick text colors shown next to the full color editor.
pub const TEXT_COLORS: &[(&str, Color32)] = &[
    ("Black", Color32::from_rgb(0, 0, 0)),
    ("Slate", Color32::from_rgb(71, 85, 105)),
    ("Red", Color32::from_rgb(220, 38, 38)),
    ("Amber", Color32::from_rgb(217, 119, 6)),
    ("Green", Color32::from_rgb(22, 163, 74)),
    ("Blue", Color32::from_rgb(37, 99, 235)),
    ("Purple", Color32::from_rgb(147, 51, 234)),
    ("White", Color32::from_rgb(255, 255, 255)),
];

/// Style for color swatches.
#[derive(Clone)]
pub struct ColorSwatchStyle {
    pub size: Vec2,
    /// Circle (true) or rounded rect (false)
    pub circular: bool,
}

impl Default for ColorSwatchStyle {
    fn default() -> Self {
        Self {
            size: vec2(sizing::SMALL, sizing::SMALL),
            circular: true,
        }
    }
}

/// A clickable color swatch.
pub struct ColorSwatch<'a> {
    color: Color32,
    tooltip: &'a str,
    selected: bool,
    style: ColorSwatchStyle,
}

impl<'a> ColorSwatch<'a> {
    pub fn new(color: Color32, tooltip: &'a str) -> Self {
        Self {
            color,
            tooltip,
            selected: false,
            style: ColorSwatchStyle::default(),
        }
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    pub fn style(mut self, style: ColorSwatchStyle) -> Self {
        self.style = style;
        self
    }

    /// Show the swatch and return (clicked, rect).
    pub fn show(self, ui: &mut Ui) -> (bool, Rect) {
        let (rect, response) = ui.allocate_exact_size(self.style.size, Sense::click());

        if ui.is_rect_visible(rect) {
            let center = rect.center();
            let radius = rect.width().min(rect.height()) / 2.0;

            if self.style.circular {
                ui.painter().circle_filled(center, radius, self.color);
                // Light colors need an outline against the panel
                ui.painter()
                    .circle_stroke(center, radius, Stroke::new(1.0, theme::BORDER));
                if self.selected {
                    ui.painter().circle_stroke(
                        center,
                        radius - 3.0,
                        Stroke::new(2.0, inner_ring_color(self.color)),
                    );
                }
            } else {
                let corner = CornerRadius::same(sizing::CORNER_RADIUS);
                ui.painter().rect_filled(rect, corner, self.color);
                let stroke = if self.selected {
                    Stroke::new(2.0, theme::ACCENT)
                } else {
                    Stroke::new(1.0, theme::BORDER)
                };
                ui.painter().rect_stroke(rect, corner, stroke, StrokeKind::Inside);
            }
        }

        let clicked = response.clicked();
        response
            .on_hover_text(self.tooltip)
            .on_hover_cursor(CursorIcon::PointingHand);
        (clicked, rect)
    }
}

/// Ring color that stays visible on both dark and light swatches.
fn inner_ring_color(color: Color32) -> Color32 {
    let luma = 0.299 * color.r() as f32 + 0.587 * color.g() as f32 + 0.114 * color.b() as f32;
    if luma < 128.0 { Color32::WHITE } else { Color32::from_gray(30) }
}

/// Check if two colors are equal ignoring alpha.
pub fn colors_match(a: Color32, b: Color32) -> bool {
    a.r() == b.r() && a.g() == b.g() && a.b() == b.b()
}

/// Parse `#rgb` or `#rrggbb`.
pub fn parse_css_color(color: &str) -> Option<Color32> {
    let hex = color.trim().strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let mut rgb = hex.chars().map(|c| channel(&c.to_string()).map(|v| v * 17));
            Some(Color32::from_rgb(rgb.next()??, rgb.next()??, rgb.next()??))
        }
        6 => Some(Color32::from_rgb(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        _ => None,
    }
}

/// Format as lowercase `#rrggbb`.
pub fn to_css_color(color: Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_long_and_short_hex() {
        assert_eq!(parse_css_color("#ff8000"), Some(Color32::from_rgb(255, 128, 0)));
        assert_eq!(parse_css_color("#f80"), Some(Color32::from_rgb(255, 136, 0)));
        assert_eq!(parse_css_color(" #000000 "), Some(Color32::BLACK));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_css_color("ff8000"), None);
        assert_eq!(parse_css_color("#ff80"), None);
        assert_eq!(parse_css_color("#gggggg"), None);
        assert_eq!(parse_css_color("#é12"), None);
    }

    #[test]
    fn test_css_output_matches_input() {
        assert_eq!(to_css_color(Color32::from_rgb(18, 52, 171)), "#1234ab");
        let black = TEXT_COLORS[0].1;
        assert_eq!(parse_css_color(&to_css_color(black)), Some(black));
    }

    #[test]
    fn test_colors_match_ignores_alpha() {
        let a = Color32::from_rgba_unmultiplied(10, 20, 30, 255);
        let b = Color32::from_rgba_unmultiplied(10, 20, 30, 255);
        assert!(colors_match(a, b));
        assert!(!colors_match(a, Color32::from_rgb(10, 20, 31)));
    }

    #[test]
    fn test_ring_contrasts_with_swatch() {
        assert_eq!(inner_ring_color(Color32::BLACK), Color32::WHITE);
        assert_eq!(inner_ring_color(Color32::WHITE), Color32::from_gray(30));
    }
}
