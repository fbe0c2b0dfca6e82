//! Language-model interpretation of transcripts.
//!
//! This module provides:
//! * [`LanguageModel`] — async trait implemented by model backends.
//! * [`ApiModel`] — OpenAI-compatible REST API backend.
//! * [`ChatMessage`] / [`Role`] — the message sequence sent per dispatch.
//! * [`build_messages`] — system instruction + few-shot pairs + transcript.
//! * [`ExampleStore`] — per-application few-shot example lookup.
//! * [`LlmError`] — error variants for model calls.

pub mod examples;
pub mod model;
pub mod prompt;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use examples::ExampleStore;
pub use model::{ApiModel, ChatMessage, LanguageModel, LlmError, Role};
pub use prompt::{build_messages, system_instruction};
