//! Pointer and keyboard input state.

use kurbo::Point;

// Use web_time for WASM compatibility
#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    /// Shift, ctrl or meta held: clicks toggle membership instead of replacing.
    pub fn toggles_selection(&self) -> bool {
        self.shift || self.ctrl || self.meta
    }
}

/// Keys the editor handles itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Delete,
    Backspace,
    Enter,
    Escape,
}

/// Double-click detection constants.
const DOUBLE_CLICK_TIME_MS: u128 = 500;
const DOUBLE_CLICK_DISTANCE: f64 = 5.0;

/// Pointer travel in screen pixels before a press becomes a drag.
pub const DRAG_THRESHOLD: f64 = 3.0;

/// Tracks pointer state between events.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Current pointer position in screen coordinates.
    pub pointer_position: Point,
    pub modifiers: Modifiers,
    /// Screen position of the current left-button press.
    pub drag_start: Option<Point>,
    /// Set once the current press has travelled past [`DRAG_THRESHOLD`].
    dragged: bool,
    last_click_time: Option<Instant>,
    last_click_position: Option<Point>,
    double_click_pending: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    pub fn pointer_down(&mut self, position: Point, button: MouseButton) {
        self.pointer_position = position;
        if button != MouseButton::Left {
            return;
        }

        let now = Instant::now();
        let is_double = match (self.last_click_time, self.last_click_position) {
            (Some(last_time), Some(last_pos)) => {
                now.duration_since(last_time).as_millis() < DOUBLE_CLICK_TIME_MS
                    && (position - last_pos).hypot() < DOUBLE_CLICK_DISTANCE
            }
            _ => false,
        };
        if is_double {
            self.double_click_pending = true;
            // Reset so a third press starts a new pair
            self.last_click_time = None;
            self.last_click_position = None;
        } else {
            self.last_click_time = Some(now);
            self.last_click_position = Some(position);
        }

        self.drag_start = Some(position);
        self.dragged = false;
    }

    pub fn pointer_move(&mut self, position: Point) {
        self.pointer_position = position;
        if let Some(start) = self.drag_start {
            if (position - start).hypot() >= DRAG_THRESHOLD {
                self.dragged = true;
            }
        }
    }

    /// Release a button. Returns true when the press travelled far enough
    /// to count as a drag.
    pub fn pointer_up(&mut self, position: Point, button: MouseButton) -> bool {
        self.pointer_position = position;
        if button != MouseButton::Left {
            return false;
        }
        let dragged = self.dragged;
        if dragged {
            // A drag never completes a double-click
            self.double_click_pending = false;
            self.last_click_time = None;
            self.last_click_position = None;
        }
        self.drag_start = None;
        self.dragged = false;
        dragged
    }

    /// Whether the current press has become a drag.
    pub fn is_dragging(&self) -> bool {
        self.dragged
    }

    /// Consume a double-click completed by the last press.
    pub fn take_double_click(&mut self) -> bool {
        std::mem::take(&mut self.double_click_pending)
    }
}
