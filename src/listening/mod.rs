//! The listening state machine.
//!
//! [`ListeningController`] owns the capture buffer and flips between
//! [`ListeningState::Idle`] and [`ListeningState::Listening`] on toggle
//! signals, with an inactivity timeout as a backstop. Completed capture
//! windows are handed to the dispatch side by ownership transfer over a
//! channel.

pub mod controller;

pub use controller::ListeningController;

// ---------------------------------------------------------------------------
// ListeningState
// ---------------------------------------------------------------------------

/// The two states of the capture state machine.
///
/// ```text
/// Idle ──toggle──────────▶ Listening     (buffer cleared, capture started)
/// Listening ──toggle─────▶ Idle          (buffer handed off to dispatch)
/// Listening ──timeout────▶ Idle          (same as toggle, fired by timer)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListeningState {
    /// Waiting for the toggle chord; the buffer is not touched.
    #[default]
    Idle,
    /// Capture is running; each tick appends pulled samples to the buffer.
    Listening,
}
