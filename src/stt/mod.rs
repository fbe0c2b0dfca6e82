//! Speech-to-text seam.
//!
//! The dispatcher only consumes [`Transcriber::transcribe`]; the production
//! implementation is [`WhisperTranscriber`].

pub mod engine;

pub use engine::{SttError, Transcriber, WhisperTranscriber};

// test-only re-export so the dispatcher test module can import the mock
// without reaching into `engine` directly.
#[cfg(test)]
pub use engine::MockTranscriber;
