//! Dedicated OS-thread chord listener using `rdev::listen`.
//!
//! `rdev::listen` is a blocking call that must live on its own OS thread.
//! [`ChordListener`] owns that thread and a stop flag; dropping it sets the
//! flag so the callback silently ignores further events.
//!
//! # Shutdown caveat
//!
//! `rdev::listen` has **no graceful shutdown API**. Setting the stop flag
//! prevents events from being forwarded, but the OS thread itself will remain
//! blocked in the rdev event loop until the process exits. This is safe and
//! expected — rdev holds no resources that need explicit cleanup.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use tokio::sync::mpsc;

use super::{Chord, HotkeyEvent};

// ---------------------------------------------------------------------------
// ChordListener
// ---------------------------------------------------------------------------

/// Handle to a running chord listener thread.
///
/// Construct one with [`ChordListener::start`]. Drop it to stop forwarding
/// toggles.
pub struct ChordListener {
    /// Shared stop flag — set `true` on [`Drop`].
    stop: Arc<AtomicBool>,
    /// The thread handle. Kept alive so the thread is not detached
    /// prematurely; we never `join` it because `rdev::listen` never returns.
    _thread: std::thread::JoinHandle<()>,
}

impl ChordListener {
    /// Spawn a dedicated OS thread that watches global key events and sends
    /// [`HotkeyEvent::Toggle`] on `tx` whenever the chord's trigger key is
    /// released while every hold key is down.
    ///
    /// `tx` should be a capacity-1 channel: only one pending toggle is
    /// honored at a time, so a toggle arriving while one is already queued is
    /// dropped (with a log line) rather than queued behind it.
    ///
    /// # Panics
    ///
    /// Panics if the OS refuses to create the thread (extremely unlikely).
    pub fn start(chord: Chord, tx: mpsc::Sender<HotkeyEvent>) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_clone = Arc::clone(&stop);

        let thread = std::thread::Builder::new()
            .name("chord-listener".into())
            .spawn(move || {
                // Per-hold down state, updated from the event stream.
                let mut held = vec![false; chord.holds.len()];

                let result = rdev::listen(move |event| {
                    if stop_clone.load(Ordering::Relaxed) {
                        return;
                    }

                    match event.event_type {
                        rdev::EventType::KeyPress(k) => {
                            for (i, hold) in chord.holds.iter().enumerate() {
                                if hold.matches(k) {
                                    held[i] = true;
                                }
                            }
                        }
                        rdev::EventType::KeyRelease(k) => {
                            if chord.trigger.matches(k) && held.iter().all(|&h| h) {
                                // try_send: the channel holds at most one
                                // pending toggle; extras are dropped.
                                if tx.try_send(HotkeyEvent::Toggle).is_err() {
                                    log::debug!("toggle already pending, chord ignored");
                                }
                            }
                            for (i, hold) in chord.holds.iter().enumerate() {
                                if hold.matches(k) {
                                    held[i] = false;
                                }
                            }
                        }
                        _ => {}
                    }
                });

                if let Err(e) = result {
                    log::error!("chord-listener: rdev::listen exited with error: {e:?}");
                }
            })
            .expect("failed to spawn chord-listener thread");

        Self {
            stop,
            _thread: thread,
        }
    }
}

impl Drop for ChordListener {
    /// Set the stop flag so the rdev callback stops forwarding toggles.
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        // The OS thread continues to exist blocked inside rdev::listen until
        // the process exits — this is safe and requires no further cleanup.
    }
}
