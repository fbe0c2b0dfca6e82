//! handsfree — speak a command, have it typed into whatever has focus.
//!
//! A global chord toggles a capture window; on toggle-off (or after an
//! inactivity timeout) the recorded audio is transcribed, the transcript is
//! interpreted by a language model into a directive string, and the
//! directive is replayed as literal typing plus modifier key-combos.
//!
//! # Subsystems
//!
//! | Module | Role |
//! |--------|------|
//! | [`hotkey`] | global toggle chord (rdev thread) |
//! | [`listening`] | Idle/Listening state machine owning the capture buffer |
//! | [`audio`] | microphone capture, resampling, debug WAV dump |
//! | [`stt`] | Whisper transcription behind the `Transcriber` seam |
//! | [`llm`] | message building and the `LanguageModel` seam |
//! | [`directive`] | directive markup lexer and key-event synthesis |
//! | [`inject`] | enigo-backed keystroke/clipboard injection |
//! | [`focus`] | frontmost-application resolution |
//! | [`dispatch`] | per-cycle transcribe → interpret → inject orchestration |
//! | [`config`] | TOML settings, paths, few-shot example sets |

pub mod audio;
pub mod config;
pub mod directive;
pub mod dispatch;
pub mod focus;
pub mod hotkey;
pub mod inject;
pub mod listening;
pub mod llm;
pub mod stt;
