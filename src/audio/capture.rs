//! Microphone capture behind the [`CaptureSource`] seam.
//!
//! [`MicSource`] is the production implementation. cpal streams are not
//! `Send` on every platform, so the cpal device and stream live on a
//! dedicated audio thread; [`MicSource`] itself only holds channel endpoints
//! and is safe to own from the listening controller's task. Raw chunks are
//! downmixed to mono and resampled to 16 kHz on the way out of
//! [`pull_chunk`](CaptureSource::pull_chunk), so the controller's buffer is
//! always transcription-ready PCM.

use std::sync::mpsc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use thiserror::Error;

use crate::audio::resample::{mix_to_mono, resample_to_16k};

/// Target sample rate of everything downstream of capture.
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

// ---------------------------------------------------------------------------
// AudioChunk
// ---------------------------------------------------------------------------

/// A single buffer of raw audio as delivered by the cpal callback.
///
/// Samples are interleaved `f32` in the range `[-1.0, 1.0]` at the device's
/// native rate and channel count.
#[derive(Debug, Clone)]
pub struct AudioChunk {
    /// Interleaved PCM samples in `[-1.0, 1.0]`.
    pub samples: Vec<f32>,
    /// Sample rate of this chunk in Hz.
    pub sample_rate: u32,
    /// Number of interleaved channels (1 = mono, 2 = stereo, …).
    pub channels: u16,
}

// ---------------------------------------------------------------------------
// CaptureError
// ---------------------------------------------------------------------------

/// Errors that can occur while setting up or running audio capture.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no input device found on the default audio host")]
    NoDevice,

    #[error("failed to query default input config: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build input stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start audio stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("audio thread is gone")]
    Disconnected,
}

// ---------------------------------------------------------------------------
// CaptureSource trait
// ---------------------------------------------------------------------------

/// The narrow capture interface the listening controller consumes.
///
/// `start`/`stop` bracket one listening window; `pull_chunk` is called on
/// every controller tick and must never block the event loop.
pub trait CaptureSource: Send {
    /// Begin streaming from the device.
    fn start(&mut self) -> Result<(), CaptureError>;

    /// Stop streaming. Chunks already pulled are unaffected.
    fn stop(&mut self) -> Result<(), CaptureError>;

    /// Return the 16 kHz mono samples that arrived since the previous pull.
    ///
    /// An empty vector is a normal result (the device produced nothing yet).
    fn pull_chunk(&mut self) -> Result<Vec<f32>, CaptureError>;
}

// ---------------------------------------------------------------------------
// Audio thread plumbing
// ---------------------------------------------------------------------------

enum AudioCommand {
    Start,
    Stop,
}

/// RAII guard that keeps a cpal stream alive; dropping it stops the stream.
struct StreamHandle {
    _stream: cpal::Stream,
}

/// Open the default input device and report its native configuration.
fn open_default_device() -> Result<(cpal::Device, cpal::StreamConfig, u32, u16), CaptureError> {
    let host = cpal::default_host();
    let device = host.default_input_device().ok_or(CaptureError::NoDevice)?;

    let supported = device.default_input_config()?;
    let channels = supported.channels();
    let sample_rate = supported.sample_rate().0;
    let config: cpal::StreamConfig = supported.into();

    Ok((device, config, sample_rate, channels))
}

/// Build and start an input stream that forwards raw chunks to `tx`.
fn open_stream(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    sample_rate: u32,
    channels: u16,
    tx: mpsc::Sender<AudioChunk>,
) -> Result<StreamHandle, CaptureError> {
    let stream = device.build_input_stream(
        config,
        move |data: &[f32], _: &cpal::InputCallbackInfo| {
            let chunk = AudioChunk {
                samples: data.to_vec(),
                sample_rate,
                channels,
            };
            // Ignore send errors; the receiver may have been dropped.
            let _ = tx.send(chunk);
        },
        |err: cpal::StreamError| {
            log::error!("cpal stream error: {err}");
        },
        None, // no timeout
    )?;

    stream.play()?;
    Ok(StreamHandle { _stream: stream })
}

// ---------------------------------------------------------------------------
// MicSource
// ---------------------------------------------------------------------------

/// Default-microphone capture source.
///
/// Construction probes the device eagerly so a missing microphone is a
/// startup failure, not a silent no-audio run.
pub struct MicSource {
    ctrl_tx: mpsc::Sender<AudioCommand>,
    chunk_rx: mpsc::Receiver<AudioChunk>,
}

impl MicSource {
    /// Probe the default input device and spawn the audio thread.
    ///
    /// # Errors
    ///
    /// [`CaptureError::NoDevice`] / [`CaptureError::DefaultConfig`] when no
    /// usable input device is available.
    pub fn new() -> Result<Self, CaptureError> {
        let (device, config, sample_rate, channels) = open_default_device()?;
        log::info!("audio input: {sample_rate} Hz, {channels} ch");

        let (ctrl_tx, ctrl_rx) = mpsc::channel::<AudioCommand>();
        let (chunk_tx, chunk_rx) = mpsc::channel::<AudioChunk>();

        std::thread::Builder::new()
            .name("audio-capture".into())
            .spawn(move || {
                let mut handle: Option<StreamHandle> = None;
                while let Ok(cmd) = ctrl_rx.recv() {
                    match cmd {
                        AudioCommand::Start => {
                            match open_stream(
                                &device,
                                &config,
                                sample_rate,
                                channels,
                                chunk_tx.clone(),
                            ) {
                                Ok(h) => handle = Some(h),
                                // The controller proceeds in degraded mode;
                                // its pulls simply come back empty.
                                Err(e) => log::error!("failed to start capture: {e}"),
                            }
                        }
                        AudioCommand::Stop => {
                            handle = None;
                        }
                    }
                }
                drop(handle);
            })
            .expect("failed to spawn audio-capture thread");

        Ok(Self { ctrl_tx, chunk_rx })
    }
}

impl CaptureSource for MicSource {
    fn start(&mut self) -> Result<(), CaptureError> {
        self.ctrl_tx
            .send(AudioCommand::Start)
            .map_err(|_| CaptureError::Disconnected)
    }

    fn stop(&mut self) -> Result<(), CaptureError> {
        self.ctrl_tx
            .send(AudioCommand::Stop)
            .map_err(|_| CaptureError::Disconnected)
    }

    fn pull_chunk(&mut self) -> Result<Vec<f32>, CaptureError> {
        let mut out = Vec::new();
        while let Ok(chunk) = self.chunk_rx.try_recv() {
            let mono = mix_to_mono(&chunk.samples, chunk.channels);
            let resampled = resample_to_16k(&mono, chunk.sample_rate);
            out.extend_from_slice(&resampled);
        }
        Ok(out)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
