//! Keyboard shortcuts for the annotation UI.

use egui::{Key, Modifiers};

/// Application-level commands reachable from the keyboard.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KeyCommand {
    /// Cancel the pending add, clear the selection, dismiss the context menu.
    Cancel,
    DeleteSelection,
    Undo,
    Redo,
    /// Select all visible points.
    SelectAll,
    /// Export CSV; a no-op with zero points.
    Export,
}

/// Map a pressed key plus modifier state to a command, if any. `command`
/// covers Ctrl and the macOS Cmd key.
pub fn command_for(key: Key, modifiers: Modifiers) -> Option<KeyCommand> {
    match key {
        Key::Escape => Some(KeyCommand::Cancel),
        Key::Delete | Key::Backspace => Some(KeyCommand::DeleteSelection),
        Key::Z if modifiers.command && modifiers.shift => Some(KeyCommand::Redo),
        Key::Z if modifiers.command => Some(KeyCommand::Undo),
        Key::Y if modifiers.command => Some(KeyCommand::Redo),
        Key::A if modifiers.command => Some(KeyCommand::SelectAll),
        Key::S if modifiers.command => Some(KeyCommand::Export),
        _ => None,
    }
}
