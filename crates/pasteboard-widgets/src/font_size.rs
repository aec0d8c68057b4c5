//! Font size selector.

use egui::{ComboBox, Ui};

/// Dropdown over a fixed list of pixel sizes.
pub struct FontSizeSelector<'a> {
    id_salt: &'a str,
    sizes: &'a [u32],
    current: u32,
}

impl<'a> FontSizeSelector<'a> {
    pub fn new(id_salt: &'a str, sizes: &'a [u32], current: u32) -> Self {
        Self { id_salt, sizes, current }
    }

    /// Show the dropdown. Returns the newly picked size.
    pub fn show(self, ui: &mut Ui) -> Option<u32> {
        let mut picked = self.current;
        ComboBox::from_id_salt(self.id_salt)
            .width(64.0)
            .selected_text(format!("{}px", self.current))
            .show_ui(ui, |ui| {
                for &size in self.sizes {
                    ui.selectable_value(&mut picked, size, format!("{size}px"));
                }
            });
        (picked != self.current).then_some(picked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unchanged_selector_reports_nothing() {
        let ctx = egui::Context::default();
        let mut result = Some(0);
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                result = FontSizeSelector::new("size", &[12, 20, 64], 20).show(ui);
            });
        });
        assert_eq!(result, None);
    }
}
