//! egui overlay: toolbar, style panel and the inline text field.

use egui::text::{CCursor, CCursorRange, LayoutJob, TextFormat};
use egui::{Align, Align2, Color32, Context, FontId, Margin, Order, TextBuffer, Vec2, pos2, vec2};
use pasteboard_core::shapes::{SerializableColor, ShapeId, TextAlign};
use pasteboard_core::style::{FONT_SIZES, StyleControls};
use pasteboard_core::text_edit::TextOverlay;
use pasteboard_widgets::{
    ColorSwatch, ColorSwatchStyle, FontSizeSelector, TEXT_COLORS, TextButton, colors_match,
    panel_frame, parse_css_color, section_label, to_css_color, toolbar_frame, vertical_separator,
};

/// UI state kept between frames.
#[derive(Debug, Default)]
pub struct UiState {
    /// Text node whose field already received focus.
    focused_edit: Option<ShapeId>,
    /// Hex field content while it has focus.
    hex_draft: Option<String>,
}

/// The open inline text field.
pub struct TextField<'a> {
    pub shape_id: ShapeId,
    pub overlay: TextOverlay,
    pub buffer: &'a mut String,
    /// Select the whole buffer this frame.
    pub select_all: bool,
}

/// What the overlay shows this frame.
#[derive(Default)]
pub struct UiView<'a> {
    pub zoom_percent: u32,
    /// Pan or zoom differ from the initial view.
    pub can_reset_view: bool,
    pub style: Option<StyleControls>,
    pub text_field: Option<TextField<'a>>,
}

/// Actions that can be triggered by the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    Upload,
    ResetZoom,
    SetFontSize(u32),
    SetColor(Color32),
    CommitText,
    CancelText,
}

pub fn to_egui_color(color: SerializableColor) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

pub fn from_egui_color(color: Color32) -> SerializableColor {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    SerializableColor::new(r, g, b, a)
}

/// Render the overlay and collect triggered actions, in order.
pub fn render_ui(ctx: &Context, ui_state: &mut UiState, view: &mut UiView) -> Vec<UiAction> {
    let mut actions = Vec::new();

    match view.text_field.as_mut() {
        Some(field) => actions.extend(render_text_field(ctx, ui_state, field)),
        None => ui_state.focused_edit = None,
    }
    actions.extend(render_toolbar(ctx, view.zoom_percent, view.can_reset_view));
    match &view.style {
        Some(style) => actions.extend(render_style_panel(ctx, ui_state, style)),
        None => ui_state.hex_draft = None,
    }
    actions
}

/// Top-left toolbar: upload, zoom reset, zoom readout.
fn render_toolbar(ctx: &Context, zoom_percent: u32, can_reset_view: bool) -> Vec<UiAction> {
    let mut actions = Vec::new();
    egui::Area::new(egui::Id::new("toolbar"))
        .anchor(Align2::LEFT_TOP, Vec2::new(12.0, 12.0))
        .show(ctx, |ui| {
            toolbar_frame().show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.spacing_mut().item_spacing = Vec2::new(4.0, 0.0);
                    if TextButton::new("Upload").show(ui) {
                        actions.push(UiAction::Upload);
                    }
                    if TextButton::new("Reset zoom").enabled(can_reset_view).show(ui) {
                        actions.push(UiAction::ResetZoom);
                    }
                    vertical_separator(ui);
                    ui.label(format!("{zoom_percent}%"));
                });
            });
        });
    actions
}

/// Font size and color controls just below the selected text node.
fn render_style_panel(ctx: &Context, ui_state: &mut UiState, style: &StyleControls) -> Vec<UiAction> {
    let mut actions = Vec::new();
    egui::Area::new(egui::Id::new("style_panel"))
        .fixed_pos(pos2(style.anchor.x as f32, style.anchor.y as f32))
        .order(Order::Foreground)
        .show(ctx, |ui| {
            panel_frame().show(ui, |ui| {
                ui.horizontal(|ui| {
                    section_label(ui, "Size");
                    if let Some(size) =
                        FontSizeSelector::new("font_size", &FONT_SIZES, style.nearest_size()).show(ui)
                    {
                        actions.push(UiAction::SetFontSize(size));
                    }

                    vertical_separator(ui);
                    section_label(ui, "Color");
                    let current = to_egui_color(style.color);
                    let mut picked = current;
                    if ui.color_edit_button_srgba(&mut picked).changed() {
                        actions.push(UiAction::SetColor(picked));
                    }
                    let swatch_style = ColorSwatchStyle {
                        size: vec2(16.0, 16.0),
                        circular: true,
                    };
                    for &(name, color) in TEXT_COLORS {
                        let (clicked, _) = ColorSwatch::new(color, name)
                            .selected(colors_match(color, current))
                            .style(swatch_style.clone())
                            .show(ui);
                        if clicked {
                            actions.push(UiAction::SetColor(color));
                        }
                    }

                    let draft = ui_state.hex_draft.get_or_insert_with(|| to_css_color(current));
                    let response = ui.add(
                        egui::TextEdit::singleline(draft)
                            .desired_width(64.0)
                            .font(egui::TextStyle::Monospace),
                    );
                    if response.lost_focus() {
                        match parse_css_color(draft) {
                            Some(color) if !colors_match(color, current) => {
                                actions.push(UiAction::SetColor(color));
                            }
                            Some(_) => {}
                            None => log::warn!("Ignoring color {draft:?}"),
                        }
                        ui_state.hex_draft = None;
                    } else if !response.has_focus() {
                        ui_state.hex_draft = None;
                    }
                });
            });
        });
    actions
}

/// Lay out the field's text with the node's size, color and line spacing.
fn field_layout_job(text: &str, overlay: &TextOverlay, wrap_width: f32) -> LayoutJob {
    let format = TextFormat {
        font_id: FontId::proportional(overlay.font_size as f32),
        color: to_egui_color(overlay.color),
        line_height: Some((overlay.font_size * overlay.line_height) as f32),
        ..Default::default()
    };
    let mut job = LayoutJob::single_section(text.to_owned(), format);
    job.wrap.max_width = wrap_width;
    job.halign = field_align(overlay.align);
    job
}

fn field_align(align: TextAlign) -> Align {
    match align {
        TextAlign::Left => Align::LEFT,
        TextAlign::Center => Align::Center,
        TextAlign::Right => Align::RIGHT,
    }
}

/// Frameless multiline field laid over the hidden text node.
///
/// Enter commits, Escape cancels, and so does any press that lands outside
/// the field once it has focus.
fn render_text_field(ctx: &Context, ui_state: &mut UiState, field: &mut TextField) -> Option<UiAction> {
    // Enter without shift and Escape never reach the field
    let commit = ctx.input_mut(|i| {
        !i.modifiers.shift && i.consume_key(egui::Modifiers::NONE, egui::Key::Enter)
    });
    let cancel = ctx.input_mut(|i| i.consume_key(egui::Modifiers::NONE, egui::Key::Escape));
    let opened_before = ui_state.focused_edit == Some(field.shape_id);

    let overlay = field.overlay.clone();
    let id = egui::Id::new(("text_field", field.shape_id));
    let width = overlay.width as f32;
    let height = overlay.height as f32;
    let mut clicked_away = false;

    egui::Area::new(egui::Id::new("text_field_area"))
        .fixed_pos(pos2(overlay.position.x as f32, overlay.position.y as f32))
        .order(Order::Foreground)
        .show(ctx, |ui| {
            ui.set_width(width);
            let mut layouter = |ui: &egui::Ui, text: &dyn TextBuffer, wrap_width: f32| {
                ui.painter()
                    .layout_job(field_layout_job(text.as_str(), &overlay, wrap_width))
            };
            let mut output = egui::TextEdit::multiline(&mut *field.buffer)
                .id(id)
                .frame(false)
                .margin(Margin::ZERO)
                .horizontal_align(field_align(overlay.align))
                .desired_width(width)
                .desired_rows(1)
                .min_size(vec2(width, height))
                .layouter(&mut layouter)
                .show(ui);

            if field.select_all {
                let end = CCursor::new(field.buffer.chars().count());
                output
                    .state
                    .cursor
                    .set_char_range(Some(CCursorRange::two(CCursor::new(0), end)));
                output.state.store(ui.ctx(), id);
            }
            if !opened_before {
                output.response.request_focus();
                ui_state.focused_edit = Some(field.shape_id);
                return;
            }

            let field_rect = output.response.rect;
            let pressed_outside = ui.input(|i| {
                i.pointer.primary_pressed()
                    && i.pointer.interact_pos().is_some_and(|pos| !field_rect.contains(pos))
            });
            clicked_away = pressed_outside || output.response.lost_focus();
        });

    if cancel {
        Some(UiAction::CancelText)
    } else if commit || clicked_away {
        Some(UiAction::CommitText)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    fn overlay() -> TextOverlay {
        TextOverlay {
            position: Point::new(40.0, 40.0),
            width: 200.0,
            height: 20.0,
            font_size: 20.0,
            line_height: 1.0,
            color: SerializableColor::black(),
            align: TextAlign::Left,
        }
    }

    fn key_input(key: egui::Key, modifiers: egui::Modifiers) -> egui::RawInput {
        egui::RawInput {
            modifiers,
            events: vec![egui::Event::Key {
                key,
                physical_key: None,
                pressed: true,
                repeat: false,
                modifiers,
            }],
            ..Default::default()
        }
    }

    fn pointer_press(pos: egui::Pos2) -> egui::RawInput {
        egui::RawInput {
            events: vec![
                egui::Event::PointerMoved(pos),
                egui::Event::PointerButton {
                    pos,
                    button: egui::PointerButton::Primary,
                    pressed: true,
                    modifiers: egui::Modifiers::NONE,
                },
            ],
            ..Default::default()
        }
    }

    /// Run one frame per input with the field open; returns the last frame's actions.
    fn run_frames(inputs: Vec<egui::RawInput>, buffer: &mut String) -> Vec<UiAction> {
        let ctx = Context::default();
        let mut state = UiState::default();
        let shape_id = ShapeId::new_v4();
        let mut actions = Vec::new();
        for input in inputs {
            let _ = ctx.run(input, |ctx| {
                let mut view = UiView {
                    zoom_percent: 100,
                    can_reset_view: false,
                    style: None,
                    text_field: Some(TextField {
                        shape_id,
                        overlay: overlay(),
                        buffer: &mut *buffer,
                        select_all: false,
                    }),
                };
                actions = render_ui(ctx, &mut state, &mut view);
            });
        }
        actions
    }

    fn run_with_field(input: egui::RawInput, buffer: &mut String) -> Vec<UiAction> {
        run_frames(vec![input], buffer)
    }

    #[test]
    fn test_idle_frame_has_no_actions() {
        let ctx = Context::default();
        let mut state = UiState::default();
        let mut actions = vec![UiAction::Upload];
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            actions = render_ui(ctx, &mut state, &mut UiView::default());
        });
        assert!(actions.is_empty());
        assert!(state.focused_edit.is_none());
    }

    #[test]
    fn test_style_panel_idle_frame() {
        let ctx = Context::default();
        let mut state = UiState::default();
        let mut actions = vec![UiAction::Upload];
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            let mut view = UiView {
                zoom_percent: 150,
                can_reset_view: true,
                style: Some(StyleControls {
                    shape_id: ShapeId::new_v4(),
                    font_size: 20.0,
                    color: SerializableColor::black(),
                    anchor: Point::new(10.0, 40.0),
                }),
                text_field: None,
            };
            actions = render_ui(ctx, &mut state, &mut view);
        });
        assert!(actions.is_empty());
        assert!(state.hex_draft.is_none());
    }

    #[test]
    fn test_enter_commits() {
        let mut buffer = "Hello".to_string();
        let actions = run_with_field(key_input(egui::Key::Enter, egui::Modifiers::NONE), &mut buffer);
        assert_eq!(actions, vec![UiAction::CommitText]);
        assert_eq!(buffer, "Hello");
    }

    #[test]
    fn test_shift_enter_does_not_commit() {
        let mut buffer = "Hello".to_string();
        let actions = run_with_field(key_input(egui::Key::Enter, egui::Modifiers::SHIFT), &mut buffer);
        assert!(!actions.contains(&UiAction::CommitText));
    }

    #[test]
    fn test_escape_cancels() {
        let mut buffer = "Hello".to_string();
        let actions = run_with_field(key_input(egui::Key::Escape, egui::Modifiers::NONE), &mut buffer);
        assert_eq!(actions, vec![UiAction::CancelText]);
    }

    #[test]
    fn test_press_outside_field_commits() {
        let mut buffer = "Hello".to_string();
        let actions = run_frames(
            vec![egui::RawInput::default(), pointer_press(pos2(600.0, 400.0))],
            &mut buffer,
        );
        assert_eq!(actions, vec![UiAction::CommitText]);
    }

    #[test]
    fn test_press_inside_field_keeps_editing() {
        let mut buffer = "Hello".to_string();
        let actions = run_frames(
            vec![egui::RawInput::default(), pointer_press(pos2(100.0, 50.0))],
            &mut buffer,
        );
        assert!(actions.is_empty());
    }

    #[test]
    fn test_opening_frame_ignores_presses() {
        let mut buffer = "Hello".to_string();
        let actions = run_with_field(pointer_press(pos2(600.0, 400.0)), &mut buffer);
        assert!(actions.is_empty());
    }

    #[test]
    fn test_field_layout_uses_line_height() {
        let mut tall = overlay();
        tall.line_height = 2.0;
        let job = field_layout_job("a\nb", &tall, 200.0);
        assert_eq!(job.sections[0].format.line_height, Some(40.0));
        assert_eq!(job.halign, Align::LEFT);

        let ctx = Context::default();
        let mut heights = (0.0, 0.0);
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            let painter = ctx.debug_painter();
            heights = (
                painter.layout_job(field_layout_job("a\nb", &overlay(), 200.0)).size().y,
                painter.layout_job(job.clone()).size().y,
            );
        });
        assert!(heights.1 > heights.0);
    }

    #[test]
    fn test_color_conversion() {
        let color = SerializableColor::from_hex("#3366cc").unwrap();
        assert_eq!(from_egui_color(to_egui_color(color)), color);
    }
}
