//! Message-sequence builder for directive interpretation.
//!
//! [`build_messages`] assembles the exact sequence the dispatcher sends for
//! one utterance: a system instruction parameterized by the active
//! application, the few-shot pairs registered for that application, and the
//! transcript as the final user turn.

use crate::config::FewShotExample;
use crate::llm::model::ChatMessage;

// ---------------------------------------------------------------------------
// System instruction
// ---------------------------------------------------------------------------

/// Instruction template; `%PROGRAM%` is replaced with the active application
/// name. The markup rules here must stay in sync with what the directive
/// lexer accepts.
const SYSTEM_INSTRUCTION: &str = "\
You are an assistant that turns transcribed voice input into keyboard input
for whatever application is currently focused.

The currently focused application is %PROGRAM%. Interpret the request in that
application's context.

When a request means a keyboard shortcut, write modifier keys in curly
braces: '{Command}+t' opens a new tab, '{Command+Shift}+d' holds both
modifiers. Recognized names are Command, Shift, Option, Control, Tab and
Enter. Prefer a Shift modifier over emitting an uppercase character.

Everything outside braces is typed literally into the application. If you are
not confident about an interpretation, return the input text unchanged.";

/// The system instruction for one active application.
pub fn system_instruction(program: &str) -> String {
    SYSTEM_INSTRUCTION.replace("%PROGRAM%", program)
}

// ---------------------------------------------------------------------------
// build_messages
// ---------------------------------------------------------------------------

/// Build the full message sequence for one dispatch:
///
/// 1. The system instruction for `program`.
/// 2. Each few-shot example as a user/assistant pair, in registration order.
/// 3. `transcript` as the final user turn.
pub fn build_messages(
    program: &str,
    examples: &[FewShotExample],
    transcript: &str,
) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(2 + examples.len() * 2);
    messages.push(ChatMessage::system(system_instruction(program)));

    for example in examples {
        messages.push(ChatMessage::user(example.input.clone()));
        messages.push(ChatMessage::assistant(example.output.clone()));
    }

    messages.push(ChatMessage::user(transcript));
    messages
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
