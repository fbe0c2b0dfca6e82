//! Input injection — replays synthesized key operations into the focused
//! application.
//!
//! [`InputInjector`] is the seam the dispatcher consumes; [`KeyboardInjector`]
//! is the enigo-backed implementation. Literal text is typed directly, with a
//! clipboard set + paste + restore fallback when direct typing fails (some
//! targets reject synthetic unicode input). Combo presses are followed by a
//! short fixed delay so the injected event registers before the next
//! operation proceeds.

pub mod keyboard;

pub use keyboard::key_from_name;

use thiserror::Error;

use crate::directive::Modifier;

// ---------------------------------------------------------------------------
// InjectError
// ---------------------------------------------------------------------------

/// All errors that can surface during input injection.
#[derive(Debug, Error)]
pub enum InjectError {
    /// Could not simulate a key press/release event.
    #[error("cannot simulate key event: {0}")]
    KeySimulation(String),

    /// The key name has no representation in the injection backend.
    #[error("no such key: {0:?}")]
    UnknownKey(String),

    /// Could not open or read the system clipboard.
    #[error("cannot access clipboard: {0}")]
    ClipboardAccess(String),

    /// Could not write text to the system clipboard.
    #[error("cannot set clipboard text: {0}")]
    ClipboardSet(String),
}

// ---------------------------------------------------------------------------
// InputInjector trait
// ---------------------------------------------------------------------------

/// The narrow injection interface the dispatcher consumes.
///
/// Both operations block until the events are delivered; callers run them on
/// the blocking thread pool.
pub trait InputInjector: Send + Sync {
    /// Type `text` verbatim into the focused application.
    fn type_literal(&self, text: &str) -> Result<(), InjectError>;

    /// Hold `modifiers` in order, tap `key`, release.
    fn press_combo(&self, modifiers: &[Modifier], key: &str) -> Result<(), InjectError>;
}

// ---------------------------------------------------------------------------
// KeyboardInjector
// ---------------------------------------------------------------------------

/// enigo-backed injector with configurable settle delays.
#[derive(Debug, Clone)]
pub struct KeyboardInjector {
    /// Milliseconds slept after every combo press.
    pub combo_settle_ms: u64,
    /// Milliseconds slept around the clipboard fallback's paste.
    pub paste_settle_ms: u64,
}

impl Default for KeyboardInjector {
    fn default() -> Self {
        Self {
            combo_settle_ms: 100,
            paste_settle_ms: 50,
        }
    }
}

impl KeyboardInjector {
    /// Create a `KeyboardInjector` with the default delays.
    pub fn new() -> Self {
        Self::default()
    }
}

impl InputInjector for KeyboardInjector {
    /// Type text directly; fall back to clipboard paste when typing fails.
    fn type_literal(&self, text: &str) -> Result<(), InjectError> {
        match keyboard::type_text(text) {
            Ok(()) => Ok(()),
            Err(e) => {
                log::warn!("direct typing failed ({e}), falling back to clipboard paste");
                keyboard::paste_via_clipboard(text, self.paste_settle_ms)
            }
        }
    }

    /// Tap the combo, then wait for it to register.
    fn press_combo(&self, modifiers: &[Modifier], key: &str) -> Result<(), InjectError> {
        keyboard::tap_combo(modifiers, key)?;
        std::thread::sleep(std::time::Duration::from_millis(self.combo_settle_ms));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
