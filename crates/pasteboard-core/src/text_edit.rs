//! Inline text editor state machine.
//!
//! While a session is open the edited node and the transformer are hidden
//! and the host shows a floating text field described by [`TextOverlay`].
//! Only one session exists at a time.

use crate::canvas::Canvas;
use crate::shapes::{SerializableColor, Shape, ShapeId, TextAlign};
use crate::text_measure::TextMeasure;
use kurbo::{Point, Rect};

/// An open edit.
#[derive(Debug, Clone)]
pub struct EditSession {
    pub shape_id: ShapeId,
    /// Content before editing, restored on cancel.
    pub original: String,
    /// Live content of the field.
    pub buffer: String,
    /// Node was created for this edit.
    pub is_new: bool,
    select_all_pending: bool,
    outside_click_armed: bool,
}

/// Screen-space geometry and styling of the floating text field.
#[derive(Debug, Clone, PartialEq)]
pub struct TextOverlay {
    /// Top-left corner in screen pixels.
    pub position: Point,
    pub width: f64,
    /// Height fitted to the current buffer.
    pub height: f64,
    pub font_size: f64,
    /// Line height as a multiple of `font_size`.
    pub line_height: f64,
    pub color: SerializableColor,
    pub align: TextAlign,
}

impl TextOverlay {
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.position, (self.width, self.height))
    }
}

#[derive(Debug, Clone, Default)]
pub struct InlineTextEditor {
    session: Option<EditSession>,
}

impl InlineTextEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.session.is_some()
    }

    pub fn editing_shape(&self) -> Option<ShapeId> {
        self.session.as_ref().map(|s| s.shape_id)
    }

    /// Field content of the open session.
    pub fn buffer_mut(&mut self) -> Option<&mut String> {
        self.session.as_mut().map(|s| &mut s.buffer)
    }

    /// Open an editor on a text node, committing any session already open.
    ///
    /// Returns false if `shape_id` is not a text node.
    pub fn begin(
        &mut self,
        canvas: &mut Canvas,
        shape_id: ShapeId,
        is_new: bool,
        measure: &mut dyn TextMeasure,
    ) -> bool {
        if self.is_editing() {
            self.commit(canvas, measure);
        }

        let Some(Shape::Text(text)) = canvas.document.get_shape_mut(shape_id) else {
            return false;
        };
        text.attrs.visible = false;
        let content = text.content.clone();
        canvas.transformer.set_visible(false);

        log::debug!("Editing text {shape_id} (new: {is_new})");
        self.session = Some(EditSession {
            shape_id,
            original: content.clone(),
            buffer: content,
            is_new,
            select_all_pending: is_new,
            outside_click_armed: false,
        });
        true
    }

    /// One-shot request to select the whole field (new nodes start with the
    /// placeholder selected).
    pub fn take_select_all(&mut self) -> bool {
        self.session
            .as_mut()
            .map(|s| std::mem::take(&mut s.select_all_pending))
            .unwrap_or(false)
    }

    pub fn arm_outside_click(&mut self) {
        if let Some(session) = &mut self.session {
            session.outside_click_armed = true;
        }
    }

    pub fn outside_click_armed(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.outside_click_armed)
    }

    /// Write the buffer back and close. Returns the edited node.
    pub fn commit(&mut self, canvas: &mut Canvas, measure: &mut dyn TextMeasure) -> Option<ShapeId> {
        let session = self.session.take()?;
        if let Some(Shape::Text(text)) = canvas.document.get_shape_mut(session.shape_id) {
            text.content = session.buffer;
            measure.fit_height(text);
            text.attrs.visible = true;
        }
        canvas.transformer.set_visible(true);
        log::debug!("Committed text {}", session.shape_id);
        Some(session.shape_id)
    }

    /// Close without touching the node's content.
    pub fn cancel(&mut self, canvas: &mut Canvas) -> Option<ShapeId> {
        let session = self.session.take()?;
        if let Some(shape) = canvas.document.get_shape_mut(session.shape_id) {
            shape.attrs_mut().visible = true;
        }
        canvas.transformer.set_visible(true);
        log::debug!("Cancelled edit of {}", session.shape_id);
        Some(session.shape_id)
    }

    /// Enter without shift commits, Escape cancels. Returns whether the key
    /// was consumed.
    pub fn handle_key(
        &mut self,
        canvas: &mut Canvas,
        key: EditKey,
        shift: bool,
        measure: &mut dyn TextMeasure,
    ) -> bool {
        if !self.is_editing() {
            return false;
        }
        match key {
            EditKey::Enter if !shift => self.commit(canvas, measure).is_some(),
            EditKey::Enter => false,
            EditKey::Escape => self.cancel(canvas).is_some(),
        }
    }

    /// Commit if the click lands outside the field and outside-click is armed.
    pub fn handle_click(
        &mut self,
        canvas: &mut Canvas,
        screen_point: Point,
        measure: &mut dyn TextMeasure,
    ) -> bool {
        if !self.outside_click_armed() {
            return false;
        }
        let inside = self
            .overlay(canvas, measure)
            .is_some_and(|o| o.rect().contains(screen_point));
        !inside && self.commit(canvas, measure).is_some()
    }

    /// Field geometry for the open session.
    pub fn overlay(&self, canvas: &Canvas, measure: &mut dyn TextMeasure) -> Option<TextOverlay> {
        let session = self.session.as_ref()?;
        let text = canvas.document.get_shape(session.shape_id)?.as_text()?;
        let zoom = canvas.camera.zoom;
        let scale = text.attrs.scale;

        let content_height = measure.measure(text, &session.buffer).height;
        Some(TextOverlay {
            position: canvas.camera.world_to_screen(text.attrs.position),
            width: text.attrs.width * scale.x * zoom,
            height: content_height.max(text.line_px()) * scale.y * zoom,
            font_size: text.font_size * scale.y * zoom,
            line_height: text.line_height,
            color: text.fill,
            align: text.align,
        })
    }
}

/// Keys the text field reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKey {
    Enter,
    Escape,
}
