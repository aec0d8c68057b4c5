//! Styled egui components for the Pasteboard overlay UI.
//!
//! - **Buttons**: toolbar text buttons
//! - **Colors**: text color palette, swatches, CSS hex conversion
//! - **Font size**: size selector over a fixed list of sizes
//! - **Menu**: panel and toolbar frames
//! - **Layout**: separators and section labels

pub mod buttons;
pub mod colors;
pub mod font_size;
pub mod layout;
pub mod menu;

pub use buttons::TextButton;
pub use colors::{ColorSwatch, ColorSwatchStyle, TEXT_COLORS, colors_match, parse_css_color, to_css_color};
pub use font_size::FontSizeSelector;
pub use layout::{section_label, vertical_separator};
pub use menu::{panel_frame, toolbar_frame};

/// Standard sizing constants used across widgets.
pub mod sizing {
    /// Small button size (icons, color swatches)
    pub const SMALL: f32 = 20.0;
    /// Standard corner radius
    pub const CORNER_RADIUS: u8 = 4;
    /// Panel corner radius
    pub const PANEL_RADIUS: u8 = 8;
}

/// Standard colors used across widgets.
pub mod theme {
    use egui::Color32;

    pub const TEXT: Color32 = Color32::from_rgb(60, 60, 60);
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(120, 120, 120);
    pub const BORDER: Color32 = Color32::from_rgb(220, 220, 220);
    /// Selection/active color (blue)
    pub const ACCENT: Color32 = Color32::from_rgb(59, 130, 246);
    pub const HOVER_BG: Color32 = Color32::from_rgb(245, 245, 245);
    pub const PANEL_BG: Color32 = Color32::from_rgba_premultiplied(250, 250, 252, 250);
}
