//! Input events consumed by the editor.
//!
//! Positions are in screen pixels; the editor maps them to world space.

use crate::element::ElementId;
use crate::tools::ToolKind;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ..Modifiers::NONE
    };

    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    };

    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Discrete editor commands, usually bound to keyboard shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KeyCommand {
    Undo,
    Redo,
    Group,
    Ungroup,
    Delete,
    SelectAll,
    ToggleDarkMode,
    /// Abort the current gesture and close any text handoff.
    Cancel,
    SetTool(ToolKind),
}

impl KeyCommand {
    /// Map a key press to a command.
    ///
    /// `key` is the logical key name ("z", "Delete", "Escape", ...), case-insensitive for letters.
    pub fn from_shortcut(key: &str, modifiers: Modifiers) -> Option<KeyCommand> {
        let lower = key.to_ascii_lowercase();
        if modifiers.command() {
            return match (lower.as_str(), modifiers.shift) {
                ("z", false) => Some(KeyCommand::Undo),
                ("z", true) | ("y", false) => Some(KeyCommand::Redo),
                ("g", false) => Some(KeyCommand::Group),
                ("g", true) => Some(KeyCommand::Ungroup),
                ("a", false) => Some(KeyCommand::SelectAll),
                _ => None,
            };
        }
        if modifiers.alt && modifiers.shift && lower == "d" {
            return Some(KeyCommand::ToggleDarkMode);
        }
        if modifiers.alt || modifiers.shift {
            return None;
        }
        let command = match lower.as_str() {
            "delete" | "backspace" => KeyCommand::Delete,
            "escape" => KeyCommand::Cancel,
            "v" | "1" => KeyCommand::SetTool(ToolKind::Selection),
            "r" | "2" => KeyCommand::SetTool(ToolKind::Rectangle),
            "o" | "3" => KeyCommand::SetTool(ToolKind::Circle),
            "d" | "4" => KeyCommand::SetTool(ToolKind::Diamond),
            "a" | "5" => KeyCommand::SetTool(ToolKind::Arrow),
            "l" | "6" => KeyCommand::SetTool(ToolKind::Line),
            "p" | "7" => KeyCommand::SetTool(ToolKind::Pencil),
            "t" | "8" => KeyCommand::SetTool(ToolKind::Text),
            "h" => KeyCommand::SetTool(ToolKind::Hand),
            _ => return None,
        };
        Some(command)
    }
}

/// One input event from the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InputEvent {
    PointerDown {
        position: Point,
        #[serde(default)]
        modifiers: Modifiers,
    },
    PointerMove {
        position: Point,
        #[serde(default)]
        modifiers: Modifiers,
    },
    /// `position` is `None` when the host lost track of the pointer.
    PointerUp {
        #[serde(default)]
        position: Option<Point>,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Wheel {
        position: Point,
        delta: Vec2,
        #[serde(default)]
        modifiers: Modifiers,
    },
    TouchStart {
        touches: Vec<Point>,
    },
    TouchMove {
        touches: Vec<Point>,
    },
    /// `touches` are the fingers still down; `changed` is the one lifted, if known.
    TouchEnd {
        #[serde(default)]
        touches: Vec<Point>,
        #[serde(default)]
        changed: Option<Point>,
    },
    Resize {
        width: f64,
        height: f64,
    },
    Key {
        key: String,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Command {
        command: KeyCommand,
    },
    /// Live update from the text-input collaborator.
    TextChanged {
        id: ElementId,
        text: String,
        width: f64,
        height: f64,
    },
    /// The text-input collaborator lost focus.
    TextCommitted,
}
