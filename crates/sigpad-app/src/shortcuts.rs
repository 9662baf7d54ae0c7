//! Keyboard shortcut registry and documentation.

use crate::ui::UiAction;

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub action: UiAction,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        action: UiAction,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            ctrl,
            action,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+S").
    pub fn format(&self) -> String {
        if self.ctrl {
            format!("Ctrl+{}", self.key)
        } else {
            self.key.to_string()
        }
    }

    /// Whether a key press (case-insensitive) triggers this shortcut.
    pub fn matches(&self, key: &str, ctrl: bool) -> bool {
        self.ctrl == ctrl && self.key.eq_ignore_ascii_case(key)
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("Delete", false, UiAction::Clear, "Clear the pad"),
            Shortcut::new("Backspace", false, UiAction::Clear, "Clear the pad"),
            Shortcut::new("E", false, UiAction::ToggleEraser, "Toggle eraser"),
            Shortcut::new("S", true, UiAction::Download, "Download signature"),
        ]
    }

    /// Action bound to a key press, if any.
    pub fn action_for(key: &str, ctrl: bool) -> Option<UiAction> {
        Self::all()
            .into_iter()
            .find(|shortcut| shortcut.matches(key, ctrl))
            .map(|shortcut| shortcut.action)
    }

    /// Shortcut label for an action (first match), for tooltips.
    pub fn label_for(action: UiAction) -> Option<String> {
        Self::all()
            .into_iter()
            .find(|shortcut| shortcut.action == action)
            .map(|shortcut| shortcut.format())
    }

    /// One-line summary, e.g. "Delete: Clear the pad, E: Toggle eraser".
    pub fn summary() -> String {
        Self::all()
            .iter()
            .map(|shortcut| format!("{}: {}", shortcut.format(), shortcut.description))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
