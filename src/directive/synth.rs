//! Key-event synthesis — resolves lexer tokens into injector operations.
//!
//! The interesting part is the combo-group ambiguity: in `{Command}+t` the
//! key is the bare `t` after the braces, but in `{Command+Shift}` there is no
//! suffix and the *last* brace-internal name is the key. [`ComboKey`] models
//! that choice as an explicit tagged variant so the policy lives in exactly
//! one place ([`split_combo`]).
//!
//! After every combo press an unconditional `shift` tap is appended. The
//! underlying injector needs the neutralization step so a held-Shift state
//! cannot bleed into the literal typing that follows.

use crate::directive::lexer::{ComboToken, Lexer, Token};

// ---------------------------------------------------------------------------
// Modifier
// ---------------------------------------------------------------------------

/// A modifier key recognized inside a combo group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    Command,
    Shift,
    Option,
    Control,
}

impl Modifier {
    /// The injector-facing name of the physical key, used when a modifier
    /// name appears in key position (e.g. `{Shift}` presses the key labelled
    /// "shift").
    pub fn key_name(self) -> &'static str {
        match self {
            Modifier::Command => "command",
            Modifier::Shift => "shift",
            Modifier::Option => "alt",
            Modifier::Control => "ctrl",
        }
    }
}

/// Resolution of one brace-internal name against the recognized-name table.
enum ResolvedName {
    /// One of the four modifier keys.
    Modifier(Modifier),
    /// A recognized key name that is not a modifier (`Tab`, `Enter`).
    Passthrough(&'static str),
}

/// The fixed recognized-name table: four modifiers plus the pass-through
/// key names the language model is told about.
fn resolve_name(name: &str) -> Option<ResolvedName> {
    match name {
        "Command" => Some(ResolvedName::Modifier(Modifier::Command)),
        "Shift" => Some(ResolvedName::Modifier(Modifier::Shift)),
        "Option" => Some(ResolvedName::Modifier(Modifier::Option)),
        "Control" => Some(ResolvedName::Modifier(Modifier::Control)),
        "Tab" => Some(ResolvedName::Passthrough("tab")),
        "Enter" => Some(ResolvedName::Passthrough("enter")),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// KeyOperation
// ---------------------------------------------------------------------------

/// One replayable operation, consumed in order by the input injector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOperation {
    /// Type `text` verbatim into the focused application.
    TypeLiteral(String),
    /// Hold `modifiers` (in order), tap `key`, release.
    PressCombo {
        modifiers: Vec<Modifier>,
        key: String,
    },
}

impl KeyOperation {
    fn shift_undo() -> Self {
        KeyOperation::PressCombo {
            modifiers: Vec::new(),
            key: "shift".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// ComboKey — the ambiguity decision point
// ---------------------------------------------------------------------------

/// Which name of a combo group is the key to press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComboKey {
    /// `{Command}+t` — an explicit bare key after the braces.
    Trailing(String),
    /// `{Command+Shift}` — no suffix; the last brace-internal name is the key.
    LastName(String),
}

/// Split a combo token into its key and the modifier-candidate names.
///
/// This is the single place where the trailing-key / last-name ambiguity is
/// decided: a trailing key claims every brace-internal name as a modifier
/// candidate; otherwise the last brace-internal name is removed from the
/// candidate list and becomes the key.
fn split_combo(combo: ComboToken) -> (ComboKey, Vec<String>) {
    let ComboToken {
        mut names,
        trailing_key,
    } = combo;

    match trailing_key {
        Some(key) => (ComboKey::Trailing(key), names),
        None => {
            // The lexer guarantees at least one name.
            let last = names.pop().unwrap_or_default();
            (ComboKey::LastName(last), names)
        }
    }
}

// ---------------------------------------------------------------------------
// Synthesis
// ---------------------------------------------------------------------------

/// Resolve one combo group into its press operation.
fn resolve_combo(combo: ComboToken) -> KeyOperation {
    let (combo_key, candidates) = split_combo(combo);

    let key = match combo_key {
        ComboKey::Trailing(key) => key,
        ComboKey::LastName(name) => match resolve_name(&name) {
            Some(ResolvedName::Modifier(m)) => m.key_name().to_string(),
            Some(ResolvedName::Passthrough(k)) => k.to_string(),
            None => {
                log::warn!("unrecognized key name {name:?}, using it verbatim");
                name.to_ascii_lowercase()
            }
        },
    };

    let modifiers = candidates
        .iter()
        .filter_map(|name| match resolve_name(name) {
            Some(ResolvedName::Modifier(m)) => Some(m),
            Some(ResolvedName::Passthrough(_)) | None => {
                log::warn!("unrecognized modifier {name:?}, dropped");
                None
            }
        })
        .collect();

    KeyOperation::PressCombo { modifiers, key }
}

/// Turn a directive string into the ordered [`KeyOperation`] sequence.
///
/// Literal tokens map 1:1 to [`KeyOperation::TypeLiteral`] (empty literals
/// are skipped); every combo group yields its press followed by the shift
/// neutralization tap. Output order equals token order, which equals the
/// directive's text order.
pub fn synthesize(directive: &str) -> Vec<KeyOperation> {
    let mut ops = Vec::new();

    for token in Lexer::new(directive) {
        match token {
            Token::Literal(text) => {
                if !text.is_empty() {
                    ops.push(KeyOperation::TypeLiteral(text));
                }
            }
            Token::Combo(combo) => {
                ops.push(resolve_combo(combo));
                ops.push(KeyOperation::shift_undo());
            }
        }
    }

    ops
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
