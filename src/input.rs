//! Input mapping — pointer/touch events and the computer keyboard table.

use std::str::FromStr;

/// What an input event asks of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Trigger,
    Release,
}

/// Pointer and touch events delivered by the page for a key element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    MouseDown,
    MouseUp,
    MouseLeave,
    PointerDown,
    PointerUp,
    PointerLeave,
    PointerCancel,
    TouchStart,
    TouchEnd,
    TouchCancel,
}

impl PointerKind {
    /// Leaving or cancelling releases exactly like lifting.
    pub fn action(self) -> KeyAction {
        match self {
            PointerKind::MouseDown | PointerKind::PointerDown | PointerKind::TouchStart => {
                KeyAction::Trigger
            }
            PointerKind::MouseUp
            | PointerKind::MouseLeave
            | PointerKind::PointerUp
            | PointerKind::PointerLeave
            | PointerKind::PointerCancel
            | PointerKind::TouchEnd
            | PointerKind::TouchCancel => KeyAction::Release,
        }
    }
}

impl FromStr for PointerKind {
    type Err = String;

    /// Parse a DOM event type, e.g. "mousedown" or "touchcancel".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s {
            "mousedown" => PointerKind::MouseDown,
            "mouseup" => PointerKind::MouseUp,
            "mouseleave" => PointerKind::MouseLeave,
            "pointerdown" => PointerKind::PointerDown,
            "pointerup" => PointerKind::PointerUp,
            "pointerleave" => PointerKind::PointerLeave,
            "pointercancel" => PointerKind::PointerCancel,
            "touchstart" => PointerKind::TouchStart,
            "touchend" => PointerKind::TouchEnd,
            "touchcancel" => PointerKind::TouchCancel,
            other => return Err(format!("unsupported pointer event \"{other}\"")),
        };
        Ok(kind)
    }
}

/// Computer keyboard characters bound to key ids, two rows spanning
/// A3..=D5 in the default layout.
const KEY_BINDINGS: [(char, &str); 18] = [
    ('z', "A3"),
    ('x', "A#3"),
    ('c', "B3"),
    ('a', "C4"),
    ('w', "C#4"),
    ('s', "D4"),
    ('e', "D#4"),
    ('d', "E4"),
    ('f', "F4"),
    ('t', "F#4"),
    ('g', "G4"),
    ('y', "G#4"),
    ('h', "A4"),
    ('u', "A#4"),
    ('j', "B4"),
    ('k', "C5"),
    ('o', "C#5"),
    ('l', "D5"),
];

/// Key id bound to a keyboard event's `key` value, case-insensitively.
///
/// Multi-character values ("Shift", "Enter") are never bound.
pub fn bound_key(key: &str) -> Option<&'static str> {
    let mut chars = key.chars();
    let ch = chars.next()?.to_ascii_lowercase();
    if chars.next().is_some() {
        return None;
    }
    KEY_BINDINGS
        .iter()
        .find(|(c, _)| *c == ch)
        .map(|(_, id)| *id)
}

/// Every binding, for hosts that draw key hints.
pub fn bindings() -> impl Iterator<Item = (char, &'static str)> {
    KEY_BINDINGS.iter().copied()
}
