//! Editor controller: routes input to the canvas and its interaction state.
//!
//! One `Editor` exists per session. Each public input method is a complete
//! dispatch; deferred actions queued during a dispatch run before it returns.

use crate::canvas::Canvas;
use crate::deferred::{DeferredAction, DeferredQueue};
use crate::error::ImportError;
use crate::input::{InputState, Key, Modifiers, MouseButton};
use crate::rubber_band::{BandRelease, RubberBand};
use crate::selection::MultiMoveState;
use crate::shapes::{Image, SerializableColor, Shape, ShapeId, Text};
use crate::style::StyleControls;
use crate::text_edit::{EditKey, InlineTextEditor, TextOverlay};
use crate::text_measure::{ApproximateMeasure, TextMeasure};
use crate::widget::ResizeState;
use kurbo::{Point, Rect};

/// Where pasted and uploaded images are placed, in world coordinates.
pub const IMPORT_POSITION: Point = Point::new(50.0, 50.0);

/// What the pressed pointer is doing.
#[derive(Debug, Default)]
enum Interaction {
    #[default]
    Idle,
    /// Pressed on a node; may turn into a move.
    Press { target: ShapeId, moving: MultiMoveState },
    Resize(ResizeState),
    RubberBand,
}

pub struct Editor {
    canvas: Canvas,
    input: InputState,
    rubber_band: RubberBand,
    text_editor: InlineTextEditor,
    deferred: DeferredQueue,
    interaction: Interaction,
    measure: Box<dyn TextMeasure>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(Box::new(ApproximateMeasure::default()))
    }
}

impl Editor {
    pub fn new(measure: Box<dyn TextMeasure>) -> Self {
        Self {
            canvas: Canvas::new(),
            input: InputState::new(),
            rubber_band: RubberBand::new(),
            text_editor: InlineTextEditor::new(),
            deferred: DeferredQueue::new(),
            interaction: Interaction::Idle,
            measure,
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    pub fn text_editor(&self) -> &InlineTextEditor {
        &self.text_editor
    }

    pub fn text_editor_mut(&mut self) -> &mut InlineTextEditor {
        &mut self.text_editor
    }

    /// Visible rubber band in world coordinates.
    pub fn rubber_band_rect(&self) -> Option<Rect> {
        self.rubber_band.rect()
    }

    /// Field geometry of the open text edit.
    pub fn text_overlay(&mut self) -> Option<TextOverlay> {
        self.text_editor.overlay(&self.canvas, self.measure.as_mut())
    }

    /// Style panel for the current selection.
    pub fn style_controls(&self) -> Option<StyleControls> {
        if self.text_editor.is_editing() {
            return None;
        }
        StyleControls::for_selection(&self.canvas)
    }

    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.input.set_modifiers(modifiers);
    }

    pub fn pointer_down(&mut self, screen: Point, button: MouseButton) {
        self.input.pointer_down(screen, button);
        if button != MouseButton::Left {
            return;
        }
        if self.is_inside_text_field(screen) {
            return;
        }

        let world = self.canvas.camera.screen_to_world(screen);
        let canvas = &self.canvas;
        if let Some(anchor) = canvas.transformer.hit_test(&canvas.document, &canvas.camera, screen) {
            if let Some(state) = canvas.transformer.begin_resize(&canvas.document, anchor, world) {
                log::debug!("Resize from {anchor:?}");
                self.interaction = Interaction::Resize(state);
                return;
            }
        }

        match self.canvas.document.object_at_point(world) {
            Some(target) => {
                // Dragging a selected node moves the whole selection
                let ids: Vec<ShapeId> = if self.canvas.is_selected(target) {
                    self.canvas.selection().ids().to_vec()
                } else {
                    vec![target]
                };
                let originals = ids
                    .into_iter()
                    .filter_map(|id| self.canvas.document.get_shape(id))
                    .filter(|s| s.attrs().draggable)
                    .map(|s| (s.id(), s.attrs().position))
                    .collect();
                self.interaction = Interaction::Press {
                    target,
                    moving: MultiMoveState::new(world, originals),
                };
            }
            None => {
                self.rubber_band.begin(world);
                self.interaction = Interaction::RubberBand;
            }
        }
    }

    pub fn pointer_move(&mut self, screen: Point) {
        self.input.pointer_move(screen);
        let world = self.canvas.camera.screen_to_world(screen);

        match &mut self.interaction {
            Interaction::Idle => {}
            Interaction::Press { moving, .. } => {
                if !self.input.is_dragging() {
                    return;
                }
                moving.moved = true;
                moving.current_point = world;
                let delta = moving.delta();
                for (&id, &origin) in &moving.original_positions {
                    if let Some(shape) = self.canvas.document.get_shape_mut(id) {
                        shape.attrs_mut().position = origin + delta;
                    }
                }
            }
            Interaction::Resize(state) => {
                self.canvas
                    .transformer
                    .resize(&mut self.canvas.document, state, world);
            }
            Interaction::RubberBand => self.rubber_band.update(world),
        }
    }

    /// Release, then the click and double-click that the release produces.
    pub fn pointer_up(&mut self, screen: Point, button: MouseButton) {
        let dragged = self.input.pointer_up(screen, button);
        if button != MouseButton::Left {
            return;
        }

        let click_target = match std::mem::take(&mut self.interaction) {
            Interaction::Idle => None,
            // Anchor drags never reach the click handler
            Interaction::Resize(_) => {
                self.flush_deferred();
                return;
            }
            Interaction::Press { target, moving } => {
                if moving.moved || dragged {
                    self.flush_deferred();
                    return;
                }
                Some(Some(target))
            }
            Interaction::RubberBand => {
                self.rubber_band.update(self.canvas.camera.screen_to_world(screen));
                match self.rubber_band.release() {
                    BandRelease::Select(rect) => {
                        let ids = self.canvas.document.shapes_in_rect(rect);
                        log::debug!("Rubber band selected {} node(s)", ids.len());
                        self.canvas.set_selection(ids);
                        self.deferred.push(DeferredAction::HideRubberBand);
                    }
                    BandRelease::Click | BandRelease::None => {}
                }
                Some(None)
            }
        };

        if let Some(target) = click_target {
            self.click(screen, target);
        }
        if self.input.take_double_click() {
            self.double_click(screen);
        }
        self.flush_deferred();
    }

    fn click(&mut self, screen: Point, target: Option<ShapeId>) {
        if self.text_editor.is_editing() {
            if self.is_inside_text_field(screen) {
                return;
            }
            self.text_editor
                .handle_click(&mut self.canvas, screen, self.measure.as_mut());
        }
        if self.rubber_band.suppresses_click() {
            return;
        }
        let toggle = self.input.modifiers.toggles_selection();
        self.canvas.apply_click(target, toggle);
    }

    /// Create a text box on empty canvas, or edit the text node under the pointer.
    pub fn double_click(&mut self, screen: Point) {
        if self.is_inside_text_field(screen) {
            return;
        }
        let world = self.canvas.camera.screen_to_world(screen);
        let target = self.canvas.document.object_at_point(world);
        let (id, is_new) = match target.and_then(|id| self.canvas.document.get_shape(id)) {
            None => {
                let mut text = Text::placeholder(world);
                self.measure.fit_height(&mut text);
                (self.canvas.add_shape(Shape::Text(text)), true)
            }
            Some(Shape::Text(text)) => (text.id, false),
            Some(Shape::Image(_)) => return,
        };
        if self
            .text_editor
            .begin(&mut self.canvas, id, is_new, self.measure.as_mut())
        {
            self.deferred.push(DeferredAction::ArmOutsideClick);
        }
    }

    /// Wheel zoom anchored at the pointer.
    pub fn wheel(&mut self, screen: Point, delta_y: f64) {
        self.canvas.camera.zoom_wheel(screen, delta_y);
        self.flush_deferred();
    }

    /// Returns whether the key was consumed.
    pub fn key(&mut self, key: Key, modifiers: Modifiers) -> bool {
        self.input.set_modifiers(modifiers);
        let handled = if self.text_editor.is_editing() {
            let edit_key = match key {
                Key::Enter => Some(EditKey::Enter),
                Key::Escape => Some(EditKey::Escape),
                Key::Delete | Key::Backspace => None,
            };
            edit_key.is_some_and(|k| {
                self.text_editor.handle_key(
                    &mut self.canvas,
                    k,
                    modifiers.shift,
                    self.measure.as_mut(),
                )
            })
        } else {
            match key {
                Key::Delete | Key::Backspace => !self.canvas.delete_selected().is_empty(),
                Key::Enter | Key::Escape => false,
            }
        };
        self.flush_deferred();
        handled
    }

    /// Track the window size.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.canvas.set_viewport_size(width, height);
    }

    /// Back to 100% with no pan.
    pub fn reset_view(&mut self) {
        self.canvas.camera.reset();
    }

    /// Add an image from encoded bytes at [`IMPORT_POSITION`].
    pub fn add_image_bytes(&mut self, bytes: impl AsRef<[u8]>) -> Result<ShapeId, ImportError> {
        let image = Image::from_bytes(IMPORT_POSITION, bytes)?;
        Ok(self.add_image(image))
    }

    /// Add an image from a base64 data URL at [`IMPORT_POSITION`].
    pub fn add_image_data_url(&mut self, url: &str) -> Result<ShapeId, ImportError> {
        let image = Image::from_data_url(IMPORT_POSITION, url)?;
        Ok(self.add_image(image))
    }

    fn add_image(&mut self, image: Image) -> ShapeId {
        log::info!(
            "Added {} image {}x{}",
            image.format.map(|f| f.mime_type()).unwrap_or("unknown"),
            image.source_width,
            image.source_height
        );
        self.canvas.add_shape(Shape::Image(image))
    }

    pub fn set_font_size(&mut self, font_size: f64) -> usize {
        self.canvas.apply_font_size(font_size, self.measure.as_mut())
    }

    pub fn set_fill(&mut self, color: SerializableColor) -> usize {
        self.canvas.apply_fill(color)
    }

    /// Commit any open text edit, e.g. when the field loses focus.
    pub fn commit_text_edit(&mut self) -> Option<ShapeId> {
        self.text_editor
            .commit(&mut self.canvas, self.measure.as_mut())
    }

    /// Run actions deferred during the dispatch that just finished.
    pub fn flush_deferred(&mut self) {
        for action in self.deferred.take() {
            match action {
                DeferredAction::HideRubberBand => self.rubber_band.hide(),
                DeferredAction::ArmOutsideClick => self.text_editor.arm_outside_click(),
            }
        }
    }

    fn is_inside_text_field(&mut self, screen: Point) -> bool {
        self.text_overlay()
            .is_some_and(|overlay| overlay.rect().contains(screen))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::png_bytes;
    use crate::widget::Anchor;

    fn click(editor: &mut Editor, at: Point) {
        editor.pointer_down(at, MouseButton::Left);
        editor.pointer_up(at, MouseButton::Left);
    }

    fn drag(editor: &mut Editor, from: Point, to: Point) {
        editor.pointer_down(from, MouseButton::Left);
        editor.pointer_move(Point::new((from.x + to.x) / 2.0, (from.y + to.y) / 2.0));
        editor.pointer_move(to);
        editor.pointer_up(to, MouseButton::Left);
    }

    fn image_at(editor: &mut Editor, x: f64, y: f64) -> ShapeId {
        let image = Image::from_bytes(Point::new(x, y), png_bytes(40, 40)).unwrap();
        editor.canvas_mut().add_shape(Shape::Image(image))
    }

    fn text_of(editor: &Editor, id: ShapeId) -> &Text {
        editor.canvas().document.get_shape(id).unwrap().as_text().unwrap()
    }

    #[test]
    fn test_click_selects_and_empty_click_clears() {
        let mut editor = Editor::default();
        let a = image_at(&mut editor, 0.0, 0.0);

        click(&mut editor, Point::new(10.0, 10.0));
        assert_eq!(editor.canvas().selection().ids(), &[a]);

        click(&mut editor, Point::new(400.0, 400.0));
        assert!(editor.canvas().selection().is_empty());
    }

    #[test]
    fn test_shift_click_toggles() {
        let mut editor = Editor::default();
        let a = image_at(&mut editor, 0.0, 0.0);
        let b = image_at(&mut editor, 100.0, 0.0);

        click(&mut editor, Point::new(10.0, 10.0));
        editor.set_modifiers(Modifiers::SHIFT);
        click(&mut editor, Point::new(110.0, 10.0));
        assert_eq!(editor.canvas().selection().ids(), &[a, b]);
        assert_eq!(editor.canvas().transformer.anchors(), &Anchor::CORNERS);

        click(&mut editor, Point::new(10.0, 10.0));
        assert_eq!(editor.canvas().selection().ids(), &[b]);
    }

    #[test]
    fn test_rubber_band_selects_and_survives_its_click() {
        let mut editor = Editor::default();
        let a = image_at(&mut editor, 0.0, 0.0);
        let b = image_at(&mut editor, 100.0, 0.0);
        let _c = image_at(&mut editor, 300.0, 300.0);

        drag(&mut editor, Point::new(-20.0, -20.0), Point::new(110.0, 10.0));
        assert_eq!(editor.canvas().selection().ids(), &[a, b]);
        assert!(editor.rubber_band_rect().is_none());

        // A later plain click on empty canvas behaves normally again
        click(&mut editor, Point::new(600.0, 600.0));
        assert!(editor.canvas().selection().is_empty());
    }

    #[test]
    fn test_tiny_rubber_band_keeps_click_semantics() {
        let mut editor = Editor::default();
        let a = image_at(&mut editor, 0.0, 0.0);
        click(&mut editor, Point::new(10.0, 10.0));
        editor.set_modifiers(Modifiers::SHIFT);

        // Small wiggle on empty canvas: a click, which clears
        drag(&mut editor, Point::new(200.0, 200.0), Point::new(203.0, 202.0));
        assert!(!editor.canvas().is_selected(a));
        assert!(editor.canvas().selection().is_empty());
    }

    #[test]
    fn test_rubber_band_missing_everything_selects_nothing() {
        let mut editor = Editor::default();
        let a = image_at(&mut editor, 0.0, 0.0);
        click(&mut editor, Point::new(10.0, 10.0));

        drag(&mut editor, Point::new(200.0, 200.0), Point::new(260.0, 260.0));
        assert!(!editor.canvas().is_selected(a));
    }

    #[test]
    fn test_rubber_band_under_zoom_uses_world_coordinates() {
        let mut editor = Editor::default();
        let a = image_at(&mut editor, 100.0, 100.0);
        editor.canvas_mut().camera.zoom = 0.5;

        drag(&mut editor, Point::new(40.0, 40.0), Point::new(60.0, 60.0));
        assert_eq!(editor.canvas().selection().ids(), &[a]);
    }

    #[test]
    fn test_drag_moves_selection_without_clicking() {
        let mut editor = Editor::default();
        let a = image_at(&mut editor, 0.0, 0.0);
        let b = image_at(&mut editor, 100.0, 0.0);
        editor.canvas_mut().set_selection([a, b]);

        drag(&mut editor, Point::new(10.0, 10.0), Point::new(30.0, 50.0));
        let pos = |id| editor.canvas().document.get_shape(id).unwrap().attrs().position;
        assert_eq!(pos(a), Point::new(20.0, 40.0));
        assert_eq!(pos(b), Point::new(120.0, 40.0));
        assert_eq!(editor.canvas().selection().len(), 2);
    }

    #[test]
    fn test_drag_unselected_node_moves_only_it() {
        let mut editor = Editor::default();
        let a = image_at(&mut editor, 0.0, 0.0);
        let b = image_at(&mut editor, 100.0, 0.0);
        editor.canvas_mut().set_selection([a]);

        drag(&mut editor, Point::new(110.0, 10.0), Point::new(110.0, 60.0));
        let pos = |id| editor.canvas().document.get_shape(id).unwrap().attrs().position;
        assert_eq!(pos(a), Point::new(0.0, 0.0));
        assert_eq!(pos(b), Point::new(100.0, 50.0));
        assert_eq!(editor.canvas().selection().ids(), &[a]);
    }

    #[test]
    fn test_anchor_drag_resizes() {
        let mut editor = Editor::default();
        let a = image_at(&mut editor, 0.0, 0.0);
        click(&mut editor, Point::new(10.0, 10.0));

        drag(&mut editor, Point::new(40.0, 40.0), Point::new(80.0, 60.0));
        let bounds = editor.canvas().document.get_shape(a).unwrap().bounds();
        assert_eq!(bounds, Rect::new(0.0, 0.0, 80.0, 60.0));
        assert_eq!(editor.canvas().selection().ids(), &[a]);
    }

    #[test]
    fn test_double_click_empty_canvas_creates_and_edits_text() {
        let mut editor = Editor::default();
        editor.canvas_mut().camera.zoom = 2.0;
        click(&mut editor, Point::new(100.0, 60.0));
        click(&mut editor, Point::new(100.0, 60.0));

        let id = editor.text_editor().editing_shape().unwrap();
        let text = text_of(&editor, id);
        assert_eq!(text.content, "New Text");
        assert_eq!(text.attrs.position, Point::new(50.0, 30.0));
        assert!(!text.attrs.visible);
        assert!(editor.text_editor().session().unwrap().is_new);
        assert!(editor.text_editor_mut().take_select_all());
        assert!(editor.text_editor().outside_click_armed());
        assert!(editor.style_controls().is_none());
    }

    #[test]
    fn test_opening_click_does_not_commit() {
        let mut editor = Editor::default();
        click(&mut editor, Point::new(300.0, 300.0));
        click(&mut editor, Point::new(300.0, 300.0));
        assert!(editor.text_editor().is_editing());

        *editor.text_editor_mut().buffer_mut().unwrap() = "Hello".into();
        let id = editor.text_editor().editing_shape().unwrap();
        click(&mut editor, Point::new(10.0, 500.0));
        assert!(!editor.text_editor().is_editing());
        assert_eq!(text_of(&editor, id).content, "Hello");
        assert!((text_of(&editor, id).attrs.height - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_click_inside_field_keeps_editing() {
        let mut editor = Editor::default();
        click(&mut editor, Point::new(300.0, 300.0));
        click(&mut editor, Point::new(300.0, 300.0));
        click(&mut editor, Point::new(320.0, 305.0));
        assert!(editor.text_editor().is_editing());
    }

    #[test]
    fn test_enter_commits_escape_cancels() {
        let mut editor = Editor::default();
        let id = editor
            .canvas_mut()
            .add_shape(Shape::Text(Text::new(Point::new(0.0, 0.0), "New Text")));

        click(&mut editor, Point::new(50.0, 5.0));
        click(&mut editor, Point::new(50.0, 5.0));
        assert_eq!(editor.text_editor().editing_shape(), Some(id));
        assert!(!editor.canvas().transformer.is_visible());

        *editor.text_editor_mut().buffer_mut().unwrap() = "Hello".into();
        assert!(!editor.key(Key::Enter, Modifiers::SHIFT));
        assert!(editor.key(Key::Enter, Modifiers::NONE));
        assert_eq!(text_of(&editor, id).content, "Hello");
        assert!(editor.canvas().transformer.is_visible());

        editor.double_click(Point::new(50.0, 5.0));
        *editor.text_editor_mut().buffer_mut().unwrap() = "discard".into();
        assert!(editor.key(Key::Escape, Modifiers::NONE));
        assert_eq!(text_of(&editor, id).content, "Hello");
    }

    #[test]
    fn test_double_click_image_does_nothing() {
        let mut editor = Editor::default();
        image_at(&mut editor, 0.0, 0.0);
        editor.double_click(Point::new(10.0, 10.0));
        assert!(!editor.text_editor().is_editing());
        assert_eq!(editor.canvas().document.len(), 1);
    }

    #[test]
    fn test_delete_key() {
        let mut editor = Editor::default();
        let ids: Vec<ShapeId> = (0..4).map(|i| image_at(&mut editor, i as f64 * 50.0, 0.0)).collect();
        assert!(!editor.key(Key::Delete, Modifiers::NONE));

        editor.canvas_mut().set_selection([ids[0], ids[1], ids[3]]);
        assert!(editor.key(Key::Backspace, Modifiers::NONE));
        assert!(editor.canvas().selection().is_empty());
        assert_eq!(editor.canvas().document.len(), 1);
        assert!(editor.canvas().document.contains(ids[2]));
    }

    #[test]
    fn test_delete_ignored_while_editing() {
        let mut editor = Editor::default();
        let id = editor
            .canvas_mut()
            .add_shape(Shape::Text(Text::new(Point::ZERO, "x")));
        editor.canvas_mut().set_selection([id]);
        editor.double_click(Point::new(5.0, 5.0));
        assert!(!editor.key(Key::Delete, Modifiers::NONE));
        assert!(editor.canvas().document.contains(id));
    }

    #[test]
    fn test_wheel_and_reset() {
        let mut editor = Editor::default();
        let pointer = Point::new(200.0, 150.0);
        let before = editor.canvas().camera.screen_to_world(pointer);
        editor.wheel(pointer, -100.0);
        let after = editor.canvas().camera.screen_to_world(pointer);
        assert!((before - after).hypot() < 1e-9);
        assert!((editor.canvas().camera.zoom - 1.1).abs() < 1e-12);

        editor.reset_view();
        assert!((editor.canvas().camera.zoom - 1.0).abs() < f64::EPSILON);
        assert_eq!(editor.canvas().camera.offset, kurbo::Vec2::ZERO);
    }

    #[test]
    fn test_import_places_image_and_rejects_garbage() {
        let mut editor = Editor::default();
        let id = editor.add_image_bytes(png_bytes(16, 8)).unwrap();
        let attrs = editor.canvas().document.get_shape(id).unwrap().attrs().clone();
        assert_eq!(attrs.position, IMPORT_POSITION);
        assert!((attrs.width - 16.0).abs() < f64::EPSILON);

        assert!(editor.add_image_bytes(b"nope".to_vec()).is_err());
        assert!(editor.add_image_data_url("data:text/plain,hello").is_err());
        assert_eq!(editor.canvas().document.len(), 1);
    }

    #[test]
    fn test_import_rejects_truncated_pixel_data() {
        let mut editor = Editor::default();
        let mut bytes = png_bytes(64, 64);
        bytes.truncate(bytes.len() - 20);
        assert!(editor.add_image_bytes(&bytes).is_err());
        assert!(editor.canvas().document.is_empty());
        assert!(editor.canvas().selection().is_empty());
    }

    #[test]
    fn test_style_setters_reach_selection() {
        let mut editor = Editor::default();
        let id = editor
            .canvas_mut()
            .add_shape(Shape::Text(Text::new(Point::ZERO, "x")));
        click(&mut editor, Point::new(50.0, 5.0));
        let controls = editor.style_controls().unwrap();
        assert_eq!(controls.shape_id, id);

        assert_eq!(editor.set_font_size(48.0), 1);
        assert_eq!(editor.set_fill(SerializableColor::from_hex("#00ff00").unwrap()), 1);
        let text = text_of(&editor, id);
        assert!((text.attrs.height - 48.0).abs() < f64::EPSILON);
        assert_eq!(text.fill.to_hex(), "#00ff00");
    }
}
