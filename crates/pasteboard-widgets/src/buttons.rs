//! Button components.

use egui::{Color32, CornerRadius, CursorIcon, Pos2, Sense, Ui, vec2};

use crate::{sizing, theme};

/// A flat text button.
pub struct TextButton<'a> {
    label: &'a str,
    enabled: bool,
}

impl<'a> TextButton<'a> {
    pub fn new(label: &'a str) -> Self {
        Self {
            label,
            enabled: true,
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Show the button and return true if clicked.
    pub fn show(self, ui: &mut Ui) -> bool {
        let font = egui::FontId::proportional(12.0);
        let label_width = ui
            .painter()
            .layout_no_wrap(self.label.to_owned(), font.clone(), theme::TEXT)
            .size()
            .x;
        let size = vec2(label_width + 16.0, 24.0);
        let sense = if self.enabled { Sense::click() } else { Sense::hover() };
        let (rect, response) = ui.allocate_exact_size(size, sense);

        if ui.is_rect_visible(rect) {
            let bg_color = if self.enabled && response.hovered() {
                theme::HOVER_BG
            } else {
                Color32::TRANSPARENT
            };
            ui.painter()
                .rect_filled(rect, CornerRadius::same(sizing::CORNER_RADIUS), bg_color);

            let text_color = if self.enabled { theme::TEXT } else { Color32::from_gray(180) };
            ui.painter().text(
                Pos2::new(rect.left() + 8.0, rect.center().y),
                egui::Align2::LEFT_CENTER,
                self.label,
                font,
                text_color,
            );
        }

        let clicked = self.enabled && response.clicked();
        if self.enabled {
            response.on_hover_cursor(CursorIcon::PointingHand);
        }
        clicked
    }
}
