//! Keyboard and pointer shortcut reference.

/// A shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(key: &'static str, ctrl: bool, shift: bool, description: &'static str) -> Self {
        Self {
            key,
            ctrl,
            shift,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+V").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }
}

/// Registry of all shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("V", true, false, "Paste image"),
            Shortcut::new("Delete", false, false, "Delete selected nodes"),
            Shortcut::new("Backspace", false, false, "Delete selected nodes"),
            Shortcut::new("Click", false, true, "Add or remove from selection"),
            Shortcut::new("Double-click", false, false, "Add or edit text"),
            Shortcut::new("Enter", false, false, "Finish editing text"),
            Shortcut::new("Enter", false, true, "New line while editing"),
            Shortcut::new("Escape", false, false, "Cancel text edit"),
            Shortcut::new("Wheel", false, false, "Zoom at pointer"),
        ]
    }

    /// One line per shortcut, for the log.
    pub fn describe_all() -> String {
        Self::all()
            .iter()
            .map(|s| format!("{:16} {}", s.format(), s.description))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format() {
        assert_eq!(Shortcut::new("V", true, false, "").format(), "Ctrl+V");
        assert_eq!(Shortcut::new("Enter", false, true, "").format(), "Shift+Enter");
        assert_eq!(Shortcut::new("Delete", false, false, "").format(), "Delete");
    }

    #[test]
    fn test_listing_has_one_line_per_shortcut() {
        assert_eq!(
            ShortcutRegistry::describe_all().lines().count(),
            ShortcutRegistry::all().len()
        );
    }
}
