//! Keystroke synthesis backed by the `enigo` crate, with a clipboard-paste
//! fallback for literal text.
//!
//! A new [`Enigo`] instance is created for each call because `Enigo` is not
//! `Send` and the handle is cheap to construct.

use arboard::Clipboard;
use enigo::{Direction, Enigo, Key, Keyboard, Settings};

use super::InjectError;
use crate::directive::Modifier;

// ---------------------------------------------------------------------------
// Key name resolution
// ---------------------------------------------------------------------------

/// Map a synthesizer key name to an enigo key.
///
/// Multi-character names are the fixed set below; any single ASCII character
/// is typed as itself. Returns `None` for names enigo cannot represent.
pub fn key_from_name(name: &str) -> Option<Key> {
    let named = match name.to_ascii_lowercase().as_str() {
        "command" | "meta" => Some(Key::Meta),
        "shift" => Some(Key::Shift),
        "alt" | "option" => Some(Key::Alt),
        "ctrl" | "control" => Some(Key::Control),
        "tab" => Some(Key::Tab),
        "enter" | "return" => Some(Key::Return),
        "space" => Some(Key::Space),
        "escape" | "esc" => Some(Key::Escape),
        "backspace" => Some(Key::Backspace),
        "delete" => Some(Key::Delete),
        _ => None,
    };
    if named.is_some() {
        return named;
    }

    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(Key::Unicode(c)),
        _ => None,
    }
}

fn modifier_key(modifier: Modifier) -> Key {
    match modifier {
        Modifier::Command => Key::Meta,
        Modifier::Shift => Key::Shift,
        Modifier::Option => Key::Alt,
        Modifier::Control => Key::Control,
    }
}

// ---------------------------------------------------------------------------
// Key events
// ---------------------------------------------------------------------------

fn new_enigo() -> Result<Enigo, InjectError> {
    Enigo::new(&Settings::default()).map_err(|e| InjectError::KeySimulation(e.to_string()))
}

fn key_event(enigo: &mut Enigo, key: Key, direction: Direction) -> Result<(), InjectError> {
    enigo
        .key(key, direction)
        .map_err(|e| InjectError::KeySimulation(e.to_string()))
}

/// Hold `modifiers` in order, tap `key`, release the modifiers in reverse
/// order.
///
/// # Errors
///
/// [`InjectError::UnknownKey`] when `key` has no enigo representation, or
/// [`InjectError::KeySimulation`] when an event fails to be delivered. Held
/// modifiers are released on a best-effort basis before the error returns.
pub fn tap_combo(modifiers: &[Modifier], key: &str) -> Result<(), InjectError> {
    let target = key_from_name(key).ok_or_else(|| InjectError::UnknownKey(key.to_string()))?;

    let mut enigo = new_enigo()?;
    let mut held: Vec<Key> = Vec::with_capacity(modifiers.len());

    let result = (|| {
        for &m in modifiers {
            let k = modifier_key(m);
            key_event(&mut enigo, k, Direction::Press)?;
            held.push(k);
        }
        key_event(&mut enigo, target, Direction::Click)
    })();

    // Never leave a modifier stuck down, even on a failed tap.
    for &k in held.iter().rev() {
        let _ = enigo.key(k, Direction::Release);
    }

    result
}

/// Type `text` verbatim via enigo's text entry.
pub fn type_text(text: &str) -> Result<(), InjectError> {
    let mut enigo = new_enigo()?;
    enigo
        .text(text)
        .map_err(|e| InjectError::KeySimulation(e.to_string()))
}

// ---------------------------------------------------------------------------
// Clipboard fallback
// ---------------------------------------------------------------------------

fn open_clipboard() -> Result<Clipboard, InjectError> {
    Clipboard::new().map_err(|e| InjectError::ClipboardAccess(e.to_string()))
}

/// Paste `text` through the clipboard when direct typing fails:
/// save the current clipboard text, set `text`, send the platform paste
/// shortcut, then restore the original content (best-effort).
///
/// `settle_ms` is slept after setting the clipboard and again after the
/// paste, so slow clipboard managers and target apps can keep up.
pub fn paste_via_clipboard(text: &str, settle_ms: u64) -> Result<(), InjectError> {
    let mut clipboard = open_clipboard()?;

    // `get_text` errors on empty or non-text content — both restore to None.
    let saved = clipboard.get_text().ok();

    clipboard
        .set_text(text)
        .map_err(|e| InjectError::ClipboardSet(e.to_string()))?;
    std::thread::sleep(std::time::Duration::from_millis(settle_ms));

    #[cfg(target_os = "macos")]
    let paste_modifier = Modifier::Command;
    #[cfg(not(target_os = "macos"))]
    let paste_modifier = Modifier::Control;

    tap_combo(&[paste_modifier], "v")?;
    std::thread::sleep(std::time::Duration::from_millis(settle_ms));

    if let Some(original) = saved {
        let _ = clipboard.set_text(original);
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_keys_resolve() {
        assert_eq!(key_from_name("shift"), Some(Key::Shift));
        assert_eq!(key_from_name("command"), Some(Key::Meta));
        assert_eq!(key_from_name("alt"), Some(Key::Alt));
        assert_eq!(key_from_name("ctrl"), Some(Key::Control));
        assert_eq!(key_from_name("tab"), Some(Key::Tab));
        assert_eq!(key_from_name("enter"), Some(Key::Return));
    }

    #[test]
    fn named_keys_are_case_insensitive() {
        assert_eq!(key_from_name("Enter"), Some(Key::Return));
        assert_eq!(key_from_name("SHIFT"), Some(Key::Shift));
    }

    #[test]
    fn single_characters_resolve_to_unicode() {
        assert_eq!(key_from_name("t"), Some(Key::Unicode('t')));
        assert_eq!(key_from_name("1"), Some(Key::Unicode('1')));
    }

    #[test]
    fn unknown_names_resolve_to_none() {
        assert_eq!(key_from_name("f13"), None);
        assert_eq!(key_from_name(""), None);
        assert_eq!(key_from_name("notakey"), None);
    }
}
