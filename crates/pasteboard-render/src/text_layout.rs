//! Parley text layout shared by drawing and measurement.

use kurbo::Size;
use parley::{Alignment, AlignmentOptions, FontContext, FontStack, Layout, LayoutContext, StyleProperty};
use pasteboard_core::shapes::{Text, TextAlign};
use pasteboard_core::text_measure::TextMeasure;
use peniko::Brush;
use std::borrow::Cow;
use std::sync::Arc;

/// Alphabetic baseline below the middle of a line, as a fraction of the font size.
const BASELINE_SHIFT: f64 = 0.35;

/// Baseline of line `index`, measured from the top of the text box.
///
/// Lines are stacked `line_px` apart with glyphs centred on each line.
pub(crate) fn baseline(text: &Text, index: usize) -> f64 {
    (index as f64 + 0.5) * text.line_px() + BASELINE_SHIFT * text.font_size
}

/// Lays out text with the bundled fonts.
///
/// Also the [`TextMeasure`] used by the editor, so committed heights match
/// what the renderer draws.
pub struct ParleyMeasure {
    font_cx: FontContext,
    layout_cx: LayoutContext<Brush>,
    /// Family name of the bundled face, used when the node's family is missing.
    fallback_family: Option<String>,
}

impl Default for ParleyMeasure {
    fn default() -> Self {
        Self::new()
    }
}

impl ParleyMeasure {
    pub fn new() -> Self {
        let mut font_cx = FontContext::new();
        let families = font_cx.collection.register_fonts(
            vello::peniko::Blob::new(Arc::new(epaint_default_fonts::UBUNTU_LIGHT)),
            None,
        );
        let fallback_family = families
            .first()
            .and_then(|(id, _)| font_cx.collection.family_name(*id))
            .map(str::to_owned);
        if fallback_family.is_none() {
            log::warn!("Bundled font did not register a family; falling back to sans-serif");
        }

        Self {
            font_cx,
            layout_cx: LayoutContext::new(),
            fallback_family,
        }
    }

    /// Font stack for a node: its own family, then the bundled face.
    fn font_stack(&self, text: &Text) -> String {
        match &self.fallback_family {
            Some(fallback) => format!("\"{}\", \"{}\", sans-serif", text.font_family, fallback),
            None => format!("\"{}\", sans-serif", text.font_family),
        }
    }

    /// Break `content` into lines at the node width and align them.
    pub(crate) fn layout(&mut self, text: &Text, content: &str, brush: Brush) -> Layout<Brush> {
        let stack = self.font_stack(text);
        let mut builder = self
            .layout_cx
            .ranged_builder(&mut self.font_cx, content, 1.0, false);
        builder.push_default(StyleProperty::FontSize(text.font_size as f32));
        builder.push_default(StyleProperty::Brush(brush));
        builder.push_default(StyleProperty::FontStack(FontStack::Source(Cow::Owned(stack))));
        let mut layout = builder.build(content);

        let width = text.attrs.width as f32;
        let alignment = match text.align {
            TextAlign::Left => Alignment::Start,
            TextAlign::Center => Alignment::Center,
            TextAlign::Right => Alignment::End,
        };
        layout.break_all_lines(Some(width));
        layout.align(Some(width), alignment, AlignmentOptions::default());
        layout
    }
}

impl TextMeasure for ParleyMeasure {
    fn measure(&mut self, text: &Text, content: &str) -> Size {
        let layout = self.layout(text, content, Brush::default());
        let lines = layout.len().max(1);
        Size::new(layout.width() as f64, lines as f64 * text.line_px())
    }
}
