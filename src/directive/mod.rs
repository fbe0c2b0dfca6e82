//! Directive markup — lexing and key-event synthesis.
//!
//! A *directive* is the single line of text the language model returns for
//! one utterance. It mixes literal text with bracketed key-combo groups:
//!
//! ```text
//! cd ~                      type the text verbatim
//! {Command}+t               press ⌘T
//! {Command+Shift}+d         press ⌘⇧D
//! {Command}+t
//! https://cnn.com{Enter}    open a tab, type a URL, press Enter
//! ```
//!
//! [`Lexer`] splits the directive into [`Token`]s in text order;
//! [`synthesize`] resolves each token into the ordered [`KeyOperation`]
//! sequence the input injector replays.

pub mod lexer;
pub mod synth;

pub use lexer::{ComboToken, Lexer, Token};
pub use synth::{synthesize, ComboKey, KeyOperation, Modifier};
