//! Input events delivered to the editor by the host UI layer.

use crate::shapes::ShapeId;
use crate::tools::ToolKind;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Pointer event in diagram coordinates.
///
/// `target` is the shape the host believes is under the pointer, if any. The
/// editor re-resolves it with its own hit tester when it is absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        target: Option<ShapeId>,
    },
    Move {
        position: Point,
    },
    Up,
    /// Pointer left the canvas. Treated exactly like `Up`.
    Leave,
    DoubleClick {
        position: Point,
        target: Option<ShapeId>,
    },
}

/// Keyboard command, with the platform modifier already resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyEvent {
    /// Delete or Backspace.
    Delete,
    Copy,
    Paste,
    Escape,
}

impl KeyEvent {
    /// Map a key name (as reported by browsers and winit) plus the
    /// platform modifier to a key event.
    pub fn from_key(key: &str, command_modifier: bool) -> Option<Self> {
        match key {
            "Delete" | "Backspace" => Some(KeyEvent::Delete),
            "Escape" => Some(KeyEvent::Escape),
            "c" | "C" if command_modifier => Some(KeyEvent::Copy),
            "v" | "V" if command_modifier => Some(KeyEvent::Paste),
            _ => None,
        }
    }
}

/// Toolbar commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToolCommand {
    Arm(ToolKind),
    ToggleShowNodes,
}

/// Events from the inline text editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextEvent {
    /// Replace the draft with the editor's current contents.
    Input(String),
    Commit,
    Blur,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(KeyEvent::from_key("Backspace", false), Some(KeyEvent::Delete));
        assert_eq!(KeyEvent::from_key("Delete", true), Some(KeyEvent::Delete));
        assert_eq!(KeyEvent::from_key("c", true), Some(KeyEvent::Copy));
        assert_eq!(KeyEvent::from_key("V", true), Some(KeyEvent::Paste));
        assert_eq!(KeyEvent::from_key("c", false), None);
        assert_eq!(KeyEvent::from_key("Escape", false), Some(KeyEvent::Escape));
    }

    #[test]
    fn test_pointer_event_json() {
        let event: PointerEvent =
            serde_json::from_str(r#"{"Move":{"position":{"x":1.0,"y":2.0}}}"#).unwrap();
        assert_eq!(event, PointerEvent::Move { position: Point::new(1.0, 2.0) });
    }
}
