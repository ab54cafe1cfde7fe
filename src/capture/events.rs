//! Normalized page-level events
//!
//! The host-page injection layer translates raw browser events into these
//! values before handing them to the recorder. Each event carries the host
//! event loop's macro-task tick so the recorder can collapse the overlapping
//! event pairs some browsers fire for a single gesture.

use super::dom::NodeId;
use serde::{Deserialize, Serialize};

/// Host platform, used only for keyboard shortcut filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Platform {
    /// macOS; paste is Cmd+V.
    Mac,
    /// Everything else; paste is Ctrl+V or Shift+Insert.
    #[default]
    Other,
}

/// Fields every page event carries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventMeta {
    /// Event timestamp in milliseconds (host page time base).
    pub timestamp: f64,
    /// Macro-task tick the event was delivered in.
    pub tick: u64,
    /// `false` for synthetic (script-dispatched) events.
    pub trusted: bool,
    /// Target element, when one was resolved.
    pub target: Option<NodeId>,
}

impl EventMeta {
    /// A trusted event on the given target.
    pub fn on(target: NodeId, timestamp: f64, tick: u64) -> Self {
        Self {
            timestamp,
            tick,
            trusted: true,
            target: Some(target),
        }
    }
}

/// A key press as delivered by the page.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct KeyPress {
    /// Logical key (`"Enter"`, `"a"`, `"Shift"`, ...).
    pub key: String,
    /// Physical key code (`"KeyL"`, ...).
    pub code: String,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
    pub shift: bool,
}

impl KeyPress {
    /// A bare key with no modifiers.
    pub fn plain(key: &str) -> Self {
        Self {
            key: key.to_string(),
            ..Default::default()
        }
    }
}

/// One normalized page-level interaction event.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    Click(EventMeta),
    ContextMenu(EventMeta),
    DragStart { meta: EventMeta, x: f64, y: f64 },
    Drop { meta: EventMeta, x: f64, y: f64 },
    /// Text entry; the current value is read back from the target element.
    Input(EventMeta),
    KeyDown { meta: EventMeta, key: KeyPress },
    /// Viewport resize; carries no element target.
    Resize {
        timestamp: f64,
        width: u32,
        height: u32,
    },
    Wheel {
        meta: EventMeta,
        delta_x: f64,
        delta_y: f64,
        page_x_offset: f64,
        page_y_offset: f64,
    },
}

impl PageEvent {
    /// The event's logical class, used by the duplicate-handling guard.
    pub fn class(&self) -> &'static str {
        match self {
            PageEvent::Click(_) => "click",
            PageEvent::ContextMenu(_) => "contextmenu",
            PageEvent::DragStart { .. } => "dragstart",
            PageEvent::Drop { .. } => "drop",
            PageEvent::Input(_) => "input",
            PageEvent::KeyDown { .. } => "keydown",
            PageEvent::Resize { .. } => "resize",
            PageEvent::Wheel { .. } => "wheel",
        }
    }

    /// Timestamp of the event in milliseconds.
    pub fn timestamp(&self) -> f64 {
        match self {
            PageEvent::Click(meta)
            | PageEvent::ContextMenu(meta)
            | PageEvent::Input(meta)
            | PageEvent::DragStart { meta, .. }
            | PageEvent::Drop { meta, .. }
            | PageEvent::KeyDown { meta, .. }
            | PageEvent::Wheel { meta, .. } => meta.timestamp,
            PageEvent::Resize { timestamp, .. } => *timestamp,
        }
    }
}

/// Decide whether a key press deserves its own Keydown action.
///
/// Mirrors the recorder heuristics of Playwright's injected recorder:
/// value-changing keys and plain printable characters are covered by Input
/// actions, bare modifiers and paste shortcuts are noise.
pub fn should_emit_key_press(platform: Platform, key: &KeyPress) -> bool {
    // Backspace, Delete, AltGraph change the input value, handled there.
    if matches!(key.key.as_str(), "AltGraph" | "Backspace" | "Delete") {
        return false;
    }
    // QWERTZ shortcut for the at sign on macOS.
    if key.key == "@" && key.code == "KeyL" {
        return false;
    }
    // Common paste shortcuts.
    match platform {
        Platform::Mac => {
            if key.key == "v" && key.meta {
                return false;
            }
        }
        Platform::Other => {
            if key.key == "v" && key.ctrl {
                return false;
            }
            if key.key == "Insert" && key.shift {
                return false;
            }
        }
    }
    if matches!(key.key.as_str(), "Shift" | "Control" | "Meta" | "Alt") {
        return false;
    }
    let has_modifier = key.ctrl || key.alt || key.meta;
    if key.key.chars().count() == 1 && !has_modifier {
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_characters_are_suppressed() {
        assert!(!should_emit_key_press(Platform::Other, &KeyPress::plain("a")));
        assert!(!should_emit_key_press(Platform::Other, &KeyPress::plain("@")));
    }

    #[test]
    fn test_action_keys_are_emitted() {
        for key in ["Enter", "Tab", "Escape", "F5", "ArrowDown"] {
            assert!(
                should_emit_key_press(Platform::Other, &KeyPress::plain(key)),
                "{key} should be emitted"
            );
        }
    }

    #[test]
    fn test_bare_modifiers_are_suppressed() {
        for key in ["Shift", "Control", "Meta", "Alt"] {
            assert!(!should_emit_key_press(Platform::Other, &KeyPress::plain(key)));
        }
    }

    #[test]
    fn test_value_changing_keys_are_suppressed() {
        for key in ["Backspace", "Delete", "AltGraph"] {
            assert!(!should_emit_key_press(Platform::Other, &KeyPress::plain(key)));
        }
    }

    #[test]
    fn test_paste_shortcuts_per_platform() {
        let cmd_v = KeyPress {
            key: "v".into(),
            meta: true,
            ..Default::default()
        };
        let ctrl_v = KeyPress {
            key: "v".into(),
            ctrl: true,
            ..Default::default()
        };
        let shift_insert = KeyPress {
            key: "Insert".into(),
            shift: true,
            ..Default::default()
        };

        assert!(!should_emit_key_press(Platform::Mac, &cmd_v));
        assert!(!should_emit_key_press(Platform::Other, &ctrl_v));
        assert!(!should_emit_key_press(Platform::Other, &shift_insert));
        // Cmd+V on non-mac is just a modified combination
        assert!(should_emit_key_press(Platform::Other, &cmd_v));
    }

    #[test]
    fn test_modified_combinations_are_emitted() {
        let ctrl_s = KeyPress {
            key: "s".into(),
            ctrl: true,
            ..Default::default()
        };
        assert!(should_emit_key_press(Platform::Other, &ctrl_s));
    }

    #[test]
    fn test_qwertz_at_sign_suppressed() {
        let at = KeyPress {
            key: "@".into(),
            code: "KeyL".into(),
            alt: true,
            ..Default::default()
        };
        assert!(!should_emit_key_press(Platform::Mac, &at));
    }

    #[test]
    fn test_event_class_and_timestamp() {
        let meta = EventMeta::on(NodeId(0), 42.0, 1);
        assert_eq!(PageEvent::Click(meta).class(), "click");
        assert_eq!(PageEvent::Click(meta).timestamp(), 42.0);
        assert_eq!(
            PageEvent::Resize {
                timestamp: 7.0,
                width: 10,
                height: 20
            }
            .class(),
            "resize"
        );
    }
}
