//! Translation of winit events into editor input.

use pasteboard_core::input::{Key, Modifiers, MouseButton};
use winit::event::MouseScrollDelta;
use winit::keyboard::{self, ModifiersState, NamedKey};

pub fn mouse_button(button: winit::event::MouseButton) -> Option<MouseButton> {
    match button {
        winit::event::MouseButton::Left => Some(MouseButton::Left),
        winit::event::MouseButton::Right => Some(MouseButton::Right),
        winit::event::MouseButton::Middle => Some(MouseButton::Middle),
        _ => None,
    }
}

pub fn modifiers(state: ModifiersState) -> Modifiers {
    Modifiers {
        shift: state.shift_key(),
        ctrl: state.control_key(),
        alt: state.alt_key(),
        meta: state.super_key(),
    }
}

pub fn editor_key(key: &keyboard::Key) -> Option<Key> {
    match key {
        keyboard::Key::Named(NamedKey::Delete) => Some(Key::Delete),
        keyboard::Key::Named(NamedKey::Backspace) => Some(Key::Backspace),
        keyboard::Key::Named(NamedKey::Enter) => Some(Key::Enter),
        keyboard::Key::Named(NamedKey::Escape) => Some(Key::Escape),
        _ => None,
    }
}

/// Whether the key is the paste shortcut (Ctrl+V, or Cmd+V on macOS).
pub fn is_paste(key: &keyboard::Key, modifiers: Modifiers) -> bool {
    let command = modifiers.ctrl || modifiers.meta;
    command && matches!(key, keyboard::Key::Character(c) if c.eq_ignore_ascii_case("v"))
}

/// Vertical wheel travel, positive when the wheel moves toward the user.
pub fn wheel_delta(delta: MouseScrollDelta) -> f64 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => -(y as f64),
        MouseScrollDelta::PixelDelta(pos) => -pos.y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    #[test]
    fn test_wheel_down_is_positive() {
        assert!(wheel_delta(MouseScrollDelta::LineDelta(0.0, -1.0)) > 0.0);
        assert!(wheel_delta(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 12.0))) < 0.0);
        assert_eq!(wheel_delta(MouseScrollDelta::LineDelta(3.0, 0.0)), 0.0);
    }

    #[test]
    fn test_editor_keys() {
        assert_eq!(editor_key(&keyboard::Key::Named(NamedKey::Backspace)), Some(Key::Backspace));
        assert_eq!(editor_key(&keyboard::Key::Named(NamedKey::Tab)), None);
        assert_eq!(editor_key(&keyboard::Key::Character("d".into())), None);
    }

    #[test]
    fn test_paste_needs_command_modifier() {
        let v = keyboard::Key::Character("V".into());
        assert!(is_paste(&v, Modifiers { ctrl: true, ..Modifiers::NONE }));
        assert!(is_paste(&v, Modifiers { meta: true, ..Modifiers::NONE }));
        assert!(!is_paste(&v, Modifiers::SHIFT));
    }

    #[test]
    fn test_modifier_mapping() {
        let mods = modifiers(ModifiersState::SHIFT | ModifiersState::SUPER);
        assert!(mods.shift && mods.meta && !mods.ctrl && !mods.alt);
        assert!(mods.toggles_selection());
    }
}
