//! Text measurement used to size text boxes after edits.

use crate::shapes::Text;
use kurbo::Size;

/// Measures text content laid out with a node's font, width and line height.
///
/// Sizes are in unscaled node units. Empty content still occupies one line.
pub trait TextMeasure {
    fn measure(&mut self, text: &Text, content: &str) -> Size;

    /// Set the node's height to fit its own content.
    fn fit_height(&mut self, text: &mut Text) {
        let size = self.measure(text, &text.content);
        text.attrs.height = size.height;
    }
}

/// Font-free measurement with a fixed advance per character.
///
/// Greedy word wrap at the node width; words longer than a line are broken
/// per character.
#[derive(Debug, Clone, Copy)]
pub struct ApproximateMeasure {
    /// Advance of one character as a fraction of the font size.
    pub char_width: f64,
}

impl Default for ApproximateMeasure {
    fn default() -> Self {
        Self { char_width: 0.55 }
    }
}

impl ApproximateMeasure {
    fn wrap_paragraph(&self, paragraph: &str, advance: f64, max_width: f64) -> (usize, f64) {
        let mut lines = 1;
        let mut line_width: f64 = 0.0;
        let mut widest: f64 = 0.0;

        for (i, word) in paragraph.split(' ').enumerate() {
            let word_width = word.chars().count() as f64 * advance;
            let space = if i == 0 { 0.0 } else { advance };

            if line_width > 0.0 && line_width + space + word_width > max_width {
                widest = widest.max(line_width);
                lines += 1;
                line_width = 0.0;
            } else {
                line_width += space;
            }

            if word_width > max_width && max_width >= advance {
                let per_line = (max_width / advance).floor().max(1.0) as usize;
                let count = word.chars().count();
                let full = (count - 1) / per_line;
                lines += full;
                widest = widest.max(per_line as f64 * advance);
                line_width = (count - full * per_line) as f64 * advance;
            } else {
                line_width += word_width;
            }
        }

        (lines, widest.max(line_width))
    }
}

impl TextMeasure for ApproximateMeasure {
    fn measure(&mut self, text: &Text, content: &str) -> Size {
        let advance = text.font_size * self.char_width;
        let max_width = text.attrs.width;

        let (lines, width) = content
            .split('\n')
            .map(|p| self.wrap_paragraph(p, advance, max_width))
            .fold((0, 0.0_f64), |(n, w), (pn, pw)| (n + pn, w.max(pw)));

        Size::new(width, lines.max(1) as f64 * text.line_px())
    }
}
