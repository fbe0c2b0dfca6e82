//! Application entry point.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Parse CLI flags (`--dump-wav`).
//! 3. Load [`AppConfig`] from disk (defaults on first run).
//! 4. Construct the external collaborators — microphone, Whisper model,
//!    language model, injector, focus resolver. Any failure here is fatal:
//!    a background keystroke injector must not half-start.
//! 5. Wire the channels, spawn the dispatcher loop, spawn the chord
//!    listener thread.
//! 6. Run the listening controller until ctrl-c.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::sync::mpsc;

use handsfree::{
    audio::MicSource,
    config::{AppConfig, AppPaths},
    dispatch::CommandDispatcher,
    focus::FrontmostResolver,
    hotkey::{Chord, ChordListener, HotkeyEvent},
    inject::{InputInjector, KeyboardInjector},
    listening::ListeningController,
    llm::{ApiModel, ExampleStore, LanguageModel},
    stt::{Transcriber, WhisperTranscriber},
};

/// Application name reported when the frontmost application is unknown.
const FALLBACK_PROGRAM: &str = "unknown";

fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("handsfree starting up");

    // 2. CLI flags
    let dump_wav = std::env::args().any(|arg| arg == "--dump-wav");

    // 3. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    rt.block_on(run(config, dump_wav))
}

async fn run(config: AppConfig, dump_wav: bool) -> anyhow::Result<()> {
    // 4. Collaborators — all failures here abort startup.
    let chord: Chord = config
        .hotkey
        .toggle_chord
        .parse()
        .context("unrecognized toggle chord in config")?;

    let model_path = AppPaths::new().model_file(&config.stt.model);
    let transcriber: Arc<dyn Transcriber> = Arc::new(
        WhisperTranscriber::load(&model_path, &config.stt.language).with_context(|| {
            format!("failed to load whisper model {}", model_path.display())
        })?,
    );
    log::info!("whisper model loaded: {}", model_path.display());

    let capture = MicSource::new().context("no usable audio input device")?;

    let model: Arc<dyn LanguageModel> = Arc::new(ApiModel::from_config(&config.llm));
    let injector: Arc<dyn InputInjector> = Arc::new(KeyboardInjector::new());
    let resolver = Arc::new(FrontmostResolver::new(FALLBACK_PROGRAM));
    let examples = Arc::new(ExampleStore::from_programs(&config.programs));

    // 5. Wiring. The toggle channel holds at most one pending toggle; the
    //    cycle channel transfers buffer ownership to the dispatcher.
    let (toggle_tx, toggle_rx) = mpsc::channel::<HotkeyEvent>(1);
    let (cycle_tx, cycle_rx) = mpsc::channel::<Vec<f32>>(8);

    let dispatcher = Arc::new(
        CommandDispatcher::new(transcriber, model, injector, resolver, examples)
            .with_wav_dump(dump_wav),
    );
    tokio::spawn(Arc::clone(&dispatcher).run(cycle_rx));

    let _listener = ChordListener::start(chord, toggle_tx);
    log::info!(
        "ready — toggle listening with {}",
        config.hotkey.toggle_chord
    );

    // 6. Event loop until ctrl-c (dropping the listener closes the toggle
    //    channel, which also ends the controller loop).
    let controller = ListeningController::new(
        capture,
        Duration::from_secs(config.listening.timeout_secs),
        Duration::from_millis(config.listening.tick_ms),
        cycle_tx,
    );

    tokio::select! {
        _ = controller.run(toggle_rx) => {}
        _ = tokio::signal::ctrl_c() => {
            log::info!("interrupt received, shutting down");
        }
    }

    Ok(())
}
