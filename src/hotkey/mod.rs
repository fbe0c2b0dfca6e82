//! Global toggle chord detection, backed by `rdev`.
//!
//! The listening toggle fires on *release* of the chord's trigger key while
//! every hold key is down — releasing Control while Command is held, with the
//! default `"Command+Control"` chord. Firing on release instead of press
//! keeps the chord's own key events out of the capture window.
//!
//! `rdev::listen()` is a blocking OS-level call that never returns while the
//! process is alive, so [`ChordListener`] runs it on a dedicated OS thread
//! (see [`listener`]).
//!
//! # Usage
//!
//! ```no_run
//! use tokio::sync::mpsc;
//! use handsfree::hotkey::{Chord, ChordListener, HotkeyEvent};
//!
//! let chord: Chord = "Command+Control".parse().expect("unknown chord");
//! let (tx, mut rx) = mpsc::channel(1);
//! let _listener = ChordListener::start(chord, tx);
//!
//! // In your async loop:
//! // while let Some(HotkeyEvent::Toggle) = rx.recv().await { ... }
//! ```

pub mod listener;

pub use listener::ChordListener;

// ---------------------------------------------------------------------------
// HotkeyEvent
// ---------------------------------------------------------------------------

/// Events emitted by the chord listener thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotkeyEvent {
    /// The toggle chord was released — flip the listening state.
    Toggle,
}

// ---------------------------------------------------------------------------
// ChordKey
// ---------------------------------------------------------------------------

/// One key of a chord. Modifier entries match either physical side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChordKey {
    Command,
    Control,
    Shift,
    Option,
    /// A non-modifier trigger key (e.g. `F9`).
    Plain(rdev::Key),
}

impl ChordKey {
    /// Whether a concrete `rdev` key event belongs to this chord key.
    pub fn matches(self, key: rdev::Key) -> bool {
        use rdev::Key::*;
        match self {
            ChordKey::Command => matches!(key, MetaLeft | MetaRight),
            ChordKey::Control => matches!(key, ControlLeft | ControlRight),
            ChordKey::Shift => matches!(key, ShiftLeft | ShiftRight),
            ChordKey::Option => matches!(key, Alt | AltGr),
            ChordKey::Plain(k) => key == k,
        }
    }
}

fn parse_chord_key(name: &str) -> Option<ChordKey> {
    match name {
        "Command" | "Cmd" | "Meta" => Some(ChordKey::Command),
        "Control" | "Ctrl" => Some(ChordKey::Control),
        "Shift" => Some(ChordKey::Shift),
        "Option" | "Alt" => Some(ChordKey::Option),
        other => parse_plain_key(other).map(ChordKey::Plain),
    }
}

/// Parse a non-modifier key name (function keys plus a few named keys).
fn parse_plain_key(name: &str) -> Option<rdev::Key> {
    use rdev::Key::*;
    match name {
        "F1" => Some(F1),
        "F2" => Some(F2),
        "F3" => Some(F3),
        "F4" => Some(F4),
        "F5" => Some(F5),
        "F6" => Some(F6),
        "F7" => Some(F7),
        "F8" => Some(F8),
        "F9" => Some(F9),
        "F10" => Some(F10),
        "F11" => Some(F11),
        "F12" => Some(F12),
        "Space" => Some(Space),
        "Escape" | "Esc" => Some(Escape),
        "CapsLock" => Some(CapsLock),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Chord
// ---------------------------------------------------------------------------

/// A parsed toggle chord: the keys that must be held, and the trigger key
/// whose release fires the toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chord {
    /// Keys that must be down when the trigger is released.
    pub holds: Vec<ChordKey>,
    /// The key whose release fires the toggle (the chord's last name).
    pub trigger: ChordKey,
}

/// Error returned when a chord string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized chord: {0:?}")]
pub struct ChordParseError(pub String);

impl std::str::FromStr for Chord {
    type Err = ChordParseError;

    /// Parse a `+`-separated chord string. The last name is the trigger;
    /// everything before it must be held.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut keys = s
            .split('+')
            .map(str::trim)
            .map(|name| parse_chord_key(name).ok_or_else(|| ChordParseError(s.to_string())))
            .collect::<Result<Vec<_>, _>>()?;

        let trigger = keys.pop().ok_or_else(|| ChordParseError(s.to_string()))?;
        if keys.is_empty() {
            // A single-key "chord" would toggle on every release of that key,
            // firing constantly during normal typing.
            return Err(ChordParseError(s.to_string()));
        }

        Ok(Chord {
            holds: keys,
            trigger,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_default_chord() {
        let chord: Chord = "Command+Control".parse().expect("valid chord");
        assert_eq!(chord.holds, vec![ChordKey::Command]);
        assert_eq!(chord.trigger, ChordKey::Control);
    }

    #[test]
    fn parse_three_key_chord() {
        let chord: Chord = "Command+Shift+F9".parse().expect("valid chord");
        assert_eq!(chord.holds, vec![ChordKey::Command, ChordKey::Shift]);
        assert_eq!(chord.trigger, ChordKey::Plain(rdev::Key::F9));
    }

    #[test]
    fn parse_accepts_aliases_and_spaces() {
        let chord: Chord = "Cmd + Ctrl".parse().expect("valid chord");
        assert_eq!(chord.holds, vec![ChordKey::Command]);
        assert_eq!(chord.trigger, ChordKey::Control);
    }

    #[test]
    fn parse_rejects_unknown_names() {
        assert!("Command+Hyper".parse::<Chord>().is_err());
        assert!("".parse::<Chord>().is_err());
    }

    #[test]
    fn parse_rejects_single_key() {
        assert!("Control".parse::<Chord>().is_err());
    }

    #[test]
    fn modifier_chord_keys_match_both_sides() {
        assert!(ChordKey::Command.matches(rdev::Key::MetaLeft));
        assert!(ChordKey::Command.matches(rdev::Key::MetaRight));
        assert!(ChordKey::Control.matches(rdev::Key::ControlLeft));
        assert!(ChordKey::Control.matches(rdev::Key::ControlRight));
        assert!(!ChordKey::Command.matches(rdev::Key::ControlLeft));
    }

    #[test]
    fn plain_chord_key_matches_exactly() {
        assert!(ChordKey::Plain(rdev::Key::F9).matches(rdev::Key::F9));
        assert!(!ChordKey::Plain(rdev::Key::F9).matches(rdev::Key::F10));
    }
}
