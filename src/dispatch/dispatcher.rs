//! The command dispatcher — one completed listening cycle in, keystrokes out.
//!
//! # Dispatch flow
//!
//! ```text
//! cycle (owned samples)
//!   └─▶ spawn_blocking(transcriber.transcribe)      empty/error → stop
//!         └─▶ build_messages(program, few-shots, transcript)
//!               └─▶ model.complete (async)          error → stop
//!                     └─▶ synthesize(directive)
//!                           └─▶ spawn_blocking(execute ops in order)
//! ```
//!
//! Every cycle runs as its own spawned task, so a slow model call never
//! delays the next listening window. Dispatches may therefore overlap; their
//! outputs reach the injector in no guaranteed order, and an in-flight
//! dispatch is never cancelled. All failures are contained here — nothing
//! propagates to the controller loop, and a failed step means no keys are
//! injected for that utterance.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::directive::{synthesize, KeyOperation};
use crate::focus::ActiveAppResolver;
use crate::inject::InputInjector;
use crate::llm::{build_messages, ExampleStore, LanguageModel};
use crate::stt::Transcriber;

// ---------------------------------------------------------------------------
// CommandDispatcher
// ---------------------------------------------------------------------------

/// Turns one completed capture window into injected keyboard input.
///
/// All collaborators sit behind `Arc`s so each spawned dispatch task can
/// share them; the dispatcher itself holds no mutable state, which is what
/// makes overlapping dispatches safe.
pub struct CommandDispatcher {
    transcriber: Arc<dyn Transcriber>,
    model: Arc<dyn LanguageModel>,
    injector: Arc<dyn InputInjector>,
    resolver: Arc<dyn ActiveAppResolver>,
    examples: Arc<ExampleStore>,
    /// When set, every cycle's audio is also written to `capture.wav`.
    dump_wav: bool,
}

impl CommandDispatcher {
    pub fn new(
        transcriber: Arc<dyn Transcriber>,
        model: Arc<dyn LanguageModel>,
        injector: Arc<dyn InputInjector>,
        resolver: Arc<dyn ActiveAppResolver>,
        examples: Arc<ExampleStore>,
    ) -> Self {
        Self {
            transcriber,
            model,
            injector,
            resolver,
            examples,
            dump_wav: false,
        }
    }

    /// Enable the `--dump-wav` debug sink.
    pub fn with_wav_dump(mut self, enabled: bool) -> Self {
        self.dump_wav = enabled;
        self
    }

    // -----------------------------------------------------------------------
    // Cycle loop
    // -----------------------------------------------------------------------

    /// Receive completed cycles until the channel closes, spawning one
    /// independent task per cycle.
    pub async fn run(self: Arc<Self>, mut cycle_rx: mpsc::Receiver<Vec<f32>>) {
        while let Some(samples) = cycle_rx.recv().await {
            let dispatcher = Arc::clone(&self);
            // Dispatches overlap deliberately: serializing them would delay a
            // fresh utterance's output behind a slow model call for an old
            // one. Injection order across overlapping cycles is unspecified.
            tokio::spawn(async move {
                dispatcher.dispatch_cycle(samples).await;
            });
        }
        log::info!("cycle channel closed, dispatcher shutting down");
    }

    /// Resolve the frontmost application and dispatch one cycle.
    async fn dispatch_cycle(&self, samples: Vec<f32>) {
        if self.dump_wav {
            let copy = samples.clone();
            tokio::task::spawn_blocking(move || {
                if let Err(e) = crate::audio::wav::write_wav("capture.wav".as_ref(), &copy) {
                    log::warn!("wav dump failed: {e}");
                }
            });
        }

        let program = self.resolver.current_application_name();
        log::info!("active application: {program}");
        self.dispatch(samples, &program).await;
    }

    // -----------------------------------------------------------------------
    // The dispatch contract
    // -----------------------------------------------------------------------

    /// Run the full transcribe → interpret → inject sequence for one cycle.
    pub async fn dispatch(&self, samples: Vec<f32>, program: &str) {
        // ── 1. Transcription ─────────────────────────────────────────────
        if samples.is_empty() {
            log::debug!("empty capture window, nothing to transcribe");
            return;
        }

        let transcriber = Arc::clone(&self.transcriber);
        let transcript = match tokio::task::spawn_blocking(move || transcriber.transcribe(&samples))
            .await
        {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                log::error!("transcription failed: {e}");
                return;
            }
            Err(e) => {
                log::error!("transcription task panicked: {e}");
                return;
            }
        };

        if transcript.is_empty() {
            log::debug!("empty transcript, nothing to interpret");
            return;
        }
        log::info!("transcribed: {transcript:?}");

        // ── 2. + 3. Interpretation ───────────────────────────────────────
        let few_shots = self.examples.for_program(program);
        log::debug!("using {} few-shot examples for {program}", few_shots.len());
        let messages = build_messages(program, few_shots, &transcript);

        let directive = match self.model.complete(&messages).await {
            Ok(text) => text,
            Err(e) => {
                log::error!("model call failed: {e}");
                return;
            }
        };
        log::info!("directive: {directive:?}");

        // ── 4. Synthesis + injection ─────────────────────────────────────
        let ops = synthesize(&directive);
        self.execute(ops).await;
    }

    /// Replay the operations in order on the blocking pool.
    ///
    /// A failing operation is logged and the rest still run — a bad key name
    /// mid-directive should not swallow the literal text after it.
    async fn execute(&self, ops: Vec<KeyOperation>) {
        if ops.is_empty() {
            return;
        }

        let injector = Arc::clone(&self.injector);
        let result = tokio::task::spawn_blocking(move || {
            for op in ops {
                match op {
                    KeyOperation::TypeLiteral(text) => {
                        log::debug!("typing {text:?}");
                        if let Err(e) = injector.type_literal(&text) {
                            log::warn!("typing failed: {e}");
                        }
                    }
                    KeyOperation::PressCombo { modifiers, key } => {
                        log::debug!("pressing {modifiers:?}+{key}");
                        if let Err(e) = injector.press_combo(&modifiers, &key) {
                            log::warn!("combo press failed: {e}");
                        }
                    }
                }
            }
        })
        .await;

        if let Err(e) = result {
            log::error!("injection task panicked: {e}");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
