//! Keyboard shortcut registry and documentation.

use doodle_core::{KeyCommand, Modifiers};

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            alt: false,
            description,
        }
    }

    pub const fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn modifiers(&self) -> Modifiers {
        Modifiers {
            shift: self.shift,
            ctrl: self.ctrl,
            alt: self.alt,
            meta: false,
        }
    }

    /// The editor command this shortcut triggers.
    pub fn command(&self) -> Option<KeyCommand> {
        KeyCommand::from_shortcut(self.key, self.modifiers())
    }

    /// Format the shortcut for display (e.g., "Ctrl+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.alt {
            parts.push("Alt");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("V", false, false, "Selection tool"),
            Shortcut::new("R", false, false, "Rectangle tool"),
            Shortcut::new("O", false, false, "Circle tool"),
            Shortcut::new("D", false, false, "Diamond tool"),
            Shortcut::new("A", false, false, "Arrow tool"),
            Shortcut::new("L", false, false, "Line tool"),
            Shortcut::new("P", false, false, "Pencil tool"),
            Shortcut::new("T", false, false, "Text tool"),
            Shortcut::new("H", false, false, "Hand tool"),
            Shortcut::new("A", true, false, "Select all elements"),
            Shortcut::new("Z", true, false, "Undo"),
            Shortcut::new("Z", true, true, "Redo"),
            Shortcut::new("Y", true, false, "Redo"),
            Shortcut::new("G", true, false, "Group selected elements"),
            Shortcut::new("G", true, true, "Ungroup selected elements"),
            Shortcut::new("D", false, true, "Toggle dark mode").with_alt(),
            Shortcut::new("Delete", false, false, "Delete selected elements"),
            Shortcut::new("Backspace", false, false, "Delete selected elements"),
            Shortcut::new("Escape", false, false, "Cancel current action"),
        ]
    }

    /// Print all shortcuts to console.
    pub fn print_all() {
        println!("\n=== Keyboard Shortcuts ===");
        for shortcut in Self::all() {
            println!("  {:20} {}", shortcut.format(), shortcut.description);
        }
        println!();
    }
}
