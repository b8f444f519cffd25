//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s.
//! The map lives in Rust so the browser host and native tests share it.

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── Tool switching ──
    ToolDraw,
    ToolErase,
    ToolText,

    // ── Edit ──
    Undo,
    Redo,
    /// Leave text edit mode (Enter / Escape in the label input).
    CommitText,
}

impl ShortcutAction {
    pub fn name(self) -> &'static str {
        match self {
            ShortcutAction::ToolDraw => "toolDraw",
            ShortcutAction::ToolErase => "toolErase",
            ShortcutAction::ToolText => "toolText",
            ShortcutAction::Undo => "undo",
            ShortcutAction::Redo => "redo",
            ShortcutAction::CommitText => "commitText",
        }
    }
}

/// Resolves key events into shortcut actions.
///
/// On macOS `meta` is ⌘; elsewhere `ctrl` plays the same role.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"z"`, `"Escape"`).
    /// `editing` is true while a text label has keyboard focus: plain
    /// letters then belong to the label, not to tool switching.
    pub fn resolve(
        key: &str,
        ctrl: bool,
        shift: bool,
        meta: bool,
        editing: bool,
    ) -> Option<ShortcutAction> {
        let cmd = ctrl || meta;

        if editing {
            return match key {
                "Enter" | "Escape" => Some(ShortcutAction::CommitText),
                _ => None,
            };
        }

        if cmd && shift {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Redo),
                _ => None,
            };
        }

        if cmd {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Undo),
                "y" | "Y" => Some(ShortcutAction::Redo),
                _ => None,
            };
        }

        match key {
            "d" | "D" | "p" | "P" => Some(ShortcutAction::ToolDraw),
            "e" | "E" => Some(ShortcutAction::ToolErase),
            "t" | "T" => Some(ShortcutAction::ToolText),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_tool_shortcuts() {
        assert_eq!(
            ShortcutMap::resolve("d", false, false, false, false),
            Some(ShortcutAction::ToolDraw)
        );
        assert_eq!(
            ShortcutMap::resolve("e", false, false, false, false),
            Some(ShortcutAction::ToolErase)
        );
        assert_eq!(
            ShortcutMap::resolve("T", false, false, false, false),
            Some(ShortcutAction::ToolText)
        );
    }

    #[test]
    fn resolve_undo_redo() {
        // Cmd+Z → Undo
        assert_eq!(
            ShortcutMap::resolve("z", false, false, true, false),
            Some(ShortcutAction::Undo)
        );
        // Ctrl+Z → Undo
        assert_eq!(
            ShortcutMap::resolve("z", true, false, false, false),
            Some(ShortcutAction::Undo)
        );
        // Cmd+Shift+Z → Redo
        assert_eq!(
            ShortcutMap::resolve("Z", false, true, true, false),
            Some(ShortcutAction::Redo)
        );
        // Ctrl+Y → Redo
        assert_eq!(
            ShortcutMap::resolve("y", true, false, false, false),
            Some(ShortcutAction::Redo)
        );
    }

    #[test]
    fn typing_into_a_label_is_not_a_shortcut() {
        assert_eq!(ShortcutMap::resolve("e", false, false, false, true), None);
        assert_eq!(ShortcutMap::resolve("z", true, false, false, true), None);
        assert_eq!(
            ShortcutMap::resolve("Escape", false, false, false, true),
            Some(ShortcutAction::CommitText)
        );
        assert_eq!(
            ShortcutMap::resolve("Enter", false, false, false, true),
            Some(ShortcutAction::CommitText)
        );
    }

    #[test]
    fn unbound_keys() {
        assert_eq!(ShortcutMap::resolve("q", false, false, false, false), None);
        assert_eq!(ShortcutMap::resolve("Enter", false, false, false, false), None);
    }
}
