//! Debug WAV dump for captured audio.
//!
//! Used by the `--dump-wav` flag: each completed listening cycle's buffer is
//! written next to the working directory so a bad transcription can be
//! replayed by ear. Output format is fixed — 16 kHz, mono, 16-bit PCM — to
//! match what the transcriber consumed.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::audio::capture::TARGET_SAMPLE_RATE;

/// Write `samples` (16 kHz mono f32 in `[-1.0, 1.0]`) to `path` as a
/// 16-bit PCM WAV file, overwriting any existing file.
pub fn write_wav(path: &Path, samples: &[f32]) -> io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);

    let data_len = (samples.len() * 2) as u32;
    let byte_rate = TARGET_SAMPLE_RATE * 2; // mono, 2 bytes per sample

    // RIFF header
    w.write_all(b"RIFF")?;
    w.write_all(&(36 + data_len).to_le_bytes())?;
    w.write_all(b"WAVE")?;

    // fmt chunk: PCM, mono, 16 kHz, 16-bit
    w.write_all(b"fmt ")?;
    w.write_all(&16u32.to_le_bytes())?;
    w.write_all(&1u16.to_le_bytes())?; // audio format: PCM
    w.write_all(&1u16.to_le_bytes())?; // channels
    w.write_all(&TARGET_SAMPLE_RATE.to_le_bytes())?;
    w.write_all(&byte_rate.to_le_bytes())?;
    w.write_all(&2u16.to_le_bytes())?; // block align
    w.write_all(&16u16.to_le_bytes())?; // bits per sample

    // data chunk
    w.write_all(b"data")?;
    w.write_all(&data_len.to_le_bytes())?;
    for &s in samples {
        let clamped = s.clamp(-1.0, 1.0);
        let pcm = (clamped * i16::MAX as f32) as i16;
        w.write_all(&pcm.to_le_bytes())?;
    }

    w.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn header_and_length_are_correct() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("out.wav");

        let samples = vec![0.0_f32; 160];
        write_wav(&path, &samples).expect("write");

        let bytes = std::fs::read(&path).expect("read back");
        assert_eq!(&bytes[..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WAVE");
        assert_eq!(&bytes[12..16], b"fmt ");
        assert_eq!(&bytes[36..40], b"data");
        // 44-byte header + 2 bytes per sample
        assert_eq!(bytes.len(), 44 + samples.len() * 2);
    }

    #[test]
    fn full_scale_samples_are_clamped() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("clip.wav");

        write_wav(&path, &[2.0, -2.0]).expect("write");

        let bytes = std::fs::read(&path).expect("read back");
        let first = i16::from_le_bytes([bytes[44], bytes[45]]);
        let second = i16::from_le_bytes([bytes[46], bytes[47]]);
        assert_eq!(first, i16::MAX);
        assert_eq!(second, -i16::MAX);
    }
}
