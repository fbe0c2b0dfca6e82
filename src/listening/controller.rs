//! The listening controller — a single event loop that serializes every
//! state transition and all buffer mutation.
//!
//! # Event sources
//!
//! The loop waits on the first-ready of three sources via `tokio::select!`:
//!
//! * the toggle channel (chord listener),
//! * the inactivity deadline, armed only while listening,
//! * a periodic tick that pulls captured samples, enabled only while
//!   listening.
//!
//! Closing the toggle channel shuts the loop down.
//!
//! # Buffer ownership
//!
//! The sample buffer belongs to the controller while listening. On the
//! Listening → Idle transition it is moved out (`std::mem::take`) and sent
//! over the cycle channel; the controller never touches that allocation
//! again, so the handoff is the only synchronization point and no locking
//! exists anywhere in the loop. Dispatch work runs in its own tasks and
//! never blocks re-entry into Listening.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, Interval, MissedTickBehavior};

use crate::audio::{CaptureSource, TARGET_SAMPLE_RATE};
use crate::hotkey::HotkeyEvent;

use super::ListeningState;

// ---------------------------------------------------------------------------
// ListeningController
// ---------------------------------------------------------------------------

/// Drives one microphone through toggle-bounded capture windows.
///
/// Create with [`ListeningController::new`], then call [`run`](Self::run)
/// inside a tokio task; it returns when the toggle channel closes.
pub struct ListeningController<C: CaptureSource> {
    state: ListeningState,
    buffer: Vec<f32>,
    capture: C,
    /// Inactivity timeout: a listening window left open this long is closed
    /// as if the user had toggled.
    timeout: Duration,
    /// Cadence of capture pulls while listening.
    tick: Duration,
    /// Completed capture windows, transferred by ownership.
    cycle_tx: mpsc::Sender<Vec<f32>>,
}

impl<C: CaptureSource> ListeningController<C> {
    /// Create an idle controller.
    pub fn new(
        capture: C,
        timeout: Duration,
        tick: Duration,
        cycle_tx: mpsc::Sender<Vec<f32>>,
    ) -> Self {
        Self {
            state: ListeningState::Idle,
            buffer: Vec::new(),
            capture,
            timeout,
            tick,
            cycle_tx,
        }
    }

    /// Run the event loop until `toggle_rx` is closed.
    pub async fn run(mut self, mut toggle_rx: mpsc::Receiver<HotkeyEvent>) {
        let mut ticker = tokio::time::interval(self.tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut deadline: Option<Instant> = None;

        log::info!("ready");
        loop {
            // Copied out so the timeout future does not borrow the slot the
            // branch handlers mutate.
            let timeout_at = deadline;

            tokio::select! {
                signal = toggle_rx.recv() => match signal {
                    Some(HotkeyEvent::Toggle) => self.flip(&mut deadline, &mut ticker).await,
                    None => break,
                },

                _ = async move { tokio::time::sleep_until(timeout_at.expect("branch guarded")).await },
                    if timeout_at.is_some() =>
                {
                    log::info!("inactivity timeout after {:?}, stopping capture", self.timeout);
                    self.flip(&mut deadline, &mut ticker).await;
                }

                _ = ticker.tick(), if self.state == ListeningState::Listening => {
                    self.pull_tick();
                }
            }
        }

        // Shutdown with a window still open: stop capture, discard the buffer.
        if self.state == ListeningState::Listening {
            if let Err(e) = self.capture.stop() {
                log::warn!("capture stop failed during shutdown: {e}");
            }
        }
        log::info!("listening controller shut down");
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    /// Apply one toggle (explicit or timeout-driven).
    async fn flip(&mut self, deadline: &mut Option<Instant>, ticker: &mut Interval) {
        match self.state {
            ListeningState::Idle => {
                self.buffer.clear();
                if let Err(e) = self.capture.start() {
                    // Listening proceeds in degraded mode; ticks pull nothing.
                    log::error!("capture start failed: {e}");
                }
                ticker.reset();
                *deadline = Some(Instant::now() + self.timeout);
                self.state = ListeningState::Listening;
                log::info!("listening...");
            }
            ListeningState::Listening => {
                *deadline = None;

                // Pull the tail captured since the last tick before stopping.
                match self.capture.pull_chunk() {
                    Ok(tail) => self.buffer.extend_from_slice(&tail),
                    Err(e) => log::warn!("final capture read failed: {e}"),
                }
                if let Err(e) = self.capture.stop() {
                    log::error!("capture stop failed: {e}");
                }

                self.state = ListeningState::Idle;
                let samples = std::mem::take(&mut self.buffer);
                log::info!(
                    "captured {:.1}s of audio",
                    samples.len() as f32 / TARGET_SAMPLE_RATE as f32
                );

                if self.cycle_tx.send(samples).await.is_err() {
                    log::warn!("dispatcher is gone, dropping captured cycle");
                }
            }
        }
    }

    /// One capture pull. A transient error skips the tick, leaving the
    /// buffer and the state machine untouched.
    fn pull_tick(&mut self) {
        debug_assert_eq!(self.state, ListeningState::Listening);
        match self.capture.pull_chunk() {
            Ok(chunk) => self.buffer.extend_from_slice(&chunk),
            Err(e) => log::warn!("capture read failed, skipping tick: {e}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::CaptureError;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    // -----------------------------------------------------------------------
    // Test double
    // -----------------------------------------------------------------------

    /// Capture source fed by the test: each pull pops one scripted result.
    struct MockCapture {
        script: Arc<Mutex<VecDeque<Result<Vec<f32>, CaptureError>>>>,
        pulls: Arc<AtomicUsize>,
        starts: Arc<AtomicUsize>,
        stops: Arc<AtomicUsize>,
        fail_start: bool,
    }

    #[derive(Clone)]
    struct CaptureProbe {
        script: Arc<Mutex<VecDeque<Result<Vec<f32>, CaptureError>>>>,
        pulls: Arc<AtomicUsize>,
        starts: Arc<AtomicUsize>,
        stops: Arc<AtomicUsize>,
    }

    impl CaptureProbe {
        fn push(&self, chunk: &[f32]) {
            self.script
                .lock()
                .unwrap()
                .push_back(Ok(chunk.to_vec()));
        }

        fn push_error(&self) {
            self.script
                .lock()
                .unwrap()
                .push_back(Err(CaptureError::Disconnected));
        }
    }

    fn mock_capture(fail_start: bool) -> (MockCapture, CaptureProbe) {
        let probe = CaptureProbe {
            script: Arc::new(Mutex::new(VecDeque::new())),
            pulls: Arc::new(AtomicUsize::new(0)),
            starts: Arc::new(AtomicUsize::new(0)),
            stops: Arc::new(AtomicUsize::new(0)),
        };
        let capture = MockCapture {
            script: Arc::clone(&probe.script),
            pulls: Arc::clone(&probe.pulls),
            starts: Arc::clone(&probe.starts),
            stops: Arc::clone(&probe.stops),
            fail_start,
        };
        (capture, probe)
    }

    impl CaptureSource for MockCapture {
        fn start(&mut self) -> Result<(), CaptureError> {
            self.starts.fetch_add(1, Ordering::SeqCst);
            if self.fail_start {
                Err(CaptureError::Disconnected)
            } else {
                Ok(())
            }
        }

        fn stop(&mut self) -> Result<(), CaptureError> {
            self.stops.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn pull_chunk(&mut self) -> Result<Vec<f32>, CaptureError> {
            self.pulls.fetch_add(1, Ordering::SeqCst);
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    struct Harness {
        toggle_tx: mpsc::Sender<HotkeyEvent>,
        cycle_rx: mpsc::Receiver<Vec<f32>>,
        probe: CaptureProbe,
        handle: tokio::task::JoinHandle<()>,
    }

    /// Spawn a controller with a 30 s timeout and 1 s tick.
    fn spawn_controller(fail_start: bool) -> Harness {
        let (capture, probe) = mock_capture(fail_start);
        let (toggle_tx, toggle_rx) = mpsc::channel(1);
        let (cycle_tx, cycle_rx) = mpsc::channel(8);

        let controller = ListeningController::new(
            capture,
            Duration::from_secs(30),
            Duration::from_secs(1),
            cycle_tx,
        );
        let handle = tokio::spawn(controller.run(toggle_rx));

        Harness {
            toggle_tx,
            cycle_rx,
            probe,
            handle,
        }
    }

    async fn toggle(h: &Harness) {
        h.toggle_tx.send(HotkeyEvent::Toggle).await.unwrap();
        // Yield so the controller observes the signal before time moves on.
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    // -----------------------------------------------------------------------
    // Tests
    // -----------------------------------------------------------------------

    /// A full toggle-on / toggle-off window delivers every captured chunk,
    /// in order, as one owned buffer.
    #[tokio::test(start_paused = true)]
    async fn toggle_window_transfers_all_samples() {
        let mut h = spawn_controller(false);

        toggle(&h).await;
        h.probe.push(&[1.0, 2.0]);
        h.probe.push(&[3.0]);
        tokio::time::sleep(Duration::from_secs(3)).await;
        toggle(&h).await;

        let cycle = h.cycle_rx.recv().await.expect("one cycle");
        assert_eq!(cycle, vec![1.0, 2.0, 3.0]);
        assert_eq!(h.probe.starts.load(Ordering::SeqCst), 1);
        assert_eq!(h.probe.stops.load(Ordering::SeqCst), 1);

        drop(h.toggle_tx);
        h.handle.await.unwrap();
    }

    /// The inactivity timer alone forces exactly one Listening → Idle
    /// transition.
    #[tokio::test(start_paused = true)]
    async fn timeout_forces_exactly_one_transition() {
        let mut h = spawn_controller(false);

        toggle(&h).await;
        h.probe.push(&[0.5]);

        // No second toggle; the 30 s deadline must fire on its own.
        let cycle = h.cycle_rx.recv().await.expect("timeout-driven cycle");
        assert_eq!(cycle, vec![0.5]);
        assert_eq!(h.probe.stops.load(Ordering::SeqCst), 1);

        // Idle afterwards: more time passing produces no further cycles.
        tokio::time::sleep(Duration::from_secs(90)).await;
        assert!(h.cycle_rx.try_recv().is_err());
        assert_eq!(h.probe.stops.load(Ordering::SeqCst), 1);

        drop(h.toggle_tx);
        h.handle.await.unwrap();
    }

    /// A failing pull skips that tick; later chunks still make it into the
    /// same cycle and the loop survives.
    #[tokio::test(start_paused = true)]
    async fn capture_error_skips_tick_without_losing_cycle() {
        let mut h = spawn_controller(false);

        toggle(&h).await;
        h.probe.push(&[1.0]);
        h.probe.push_error();
        h.probe.push(&[2.0]);
        tokio::time::sleep(Duration::from_secs(4)).await;
        toggle(&h).await;

        let cycle = h.cycle_rx.recv().await.expect("cycle despite error");
        assert_eq!(cycle, vec![1.0, 2.0]);

        drop(h.toggle_tx);
        h.handle.await.unwrap();
    }

    /// The buffer is cleared on every Idle → Listening transition: the second
    /// window never contains the first window's audio.
    #[tokio::test(start_paused = true)]
    async fn second_window_starts_from_empty_buffer() {
        let mut h = spawn_controller(false);

        toggle(&h).await;
        h.probe.push(&[1.0]);
        tokio::time::sleep(Duration::from_secs(2)).await;
        toggle(&h).await;
        assert_eq!(h.cycle_rx.recv().await.unwrap(), vec![1.0]);

        toggle(&h).await;
        h.probe.push(&[2.0]);
        tokio::time::sleep(Duration::from_secs(2)).await;
        toggle(&h).await;
        assert_eq!(h.cycle_rx.recv().await.unwrap(), vec![2.0]);

        drop(h.toggle_tx);
        h.handle.await.unwrap();
    }

    /// While Idle, the controller never pulls from (or appends to) the
    /// capture source, no matter how much time passes.
    #[tokio::test(start_paused = true)]
    async fn idle_controller_never_pulls() {
        let h = spawn_controller(false);

        tokio::time::sleep(Duration::from_secs(10)).await;

        assert_eq!(h.probe.pulls.load(Ordering::SeqCst), 0);
        assert_eq!(h.probe.starts.load(Ordering::SeqCst), 0);

        drop(h.toggle_tx);
        h.handle.await.unwrap();
    }

    /// A capture-start failure degrades the window instead of blocking the
    /// transition: the cycle still completes.
    #[tokio::test(start_paused = true)]
    async fn start_failure_does_not_block_transitions() {
        let mut h = spawn_controller(true);

        toggle(&h).await;
        h.probe.push(&[9.0]);
        tokio::time::sleep(Duration::from_secs(2)).await;
        toggle(&h).await;

        // The window opened, ticked and closed normally.
        let cycle = h.cycle_rx.recv().await.expect("cycle despite start failure");
        assert_eq!(cycle, vec![9.0]);
        assert_eq!(h.probe.starts.load(Ordering::SeqCst), 1);

        drop(h.toggle_tx);
        h.handle.await.unwrap();
    }

    /// An immediate toggle-off hands over an empty buffer; emptiness is the
    /// dispatcher's concern, not the controller's.
    #[tokio::test(start_paused = true)]
    async fn empty_window_still_hands_off() {
        let mut h = spawn_controller(false);

        toggle(&h).await;
        toggle(&h).await;

        let cycle = h.cycle_rx.recv().await.expect("empty cycle");
        assert!(cycle.is_empty());

        drop(h.toggle_tx);
        h.handle.await.unwrap();
    }
}
