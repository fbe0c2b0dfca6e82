//! Audio capture and sample conditioning.
//!
//! [`MicSource`] streams from the default microphone and hands out 16 kHz
//! mono `f32` PCM through the [`CaptureSource`] seam; [`wav`] provides the
//! debug dump used by `--dump-wav`.

pub mod capture;
pub mod resample;
pub mod wav;

pub use capture::{AudioChunk, CaptureError, CaptureSource, MicSource, TARGET_SAMPLE_RATE};
pub use resample::{mix_to_mono, resample_to_16k};
