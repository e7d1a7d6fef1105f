//! Decoding through an external `ffmpeg`.
//!
//! Symphonia covers the common containers and codecs but not all of them (Opus audio in
//! WebM/MKV/Ogg is the usual gap). When `ffmpeg` is installed it decodes those inputs straight to
//! Whisper's format: raw little-endian `f32`, mono, 16 kHz, on stdout.

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, bail};

use crate::audio_pipeline::WHISPER_SAMPLE_RATE;

/// Locate `ffmpeg` on `PATH`.
pub fn find_ffmpeg() -> Option<PathBuf> {
    which::which("ffmpeg").ok()
}

/// Decode the first audio stream of `input` with the `ffmpeg` binary at `ffmpeg`.
pub fn decode_with_ffmpeg(ffmpeg: &Path, input: &Path) -> Result<Vec<f32>> {
    let output = Command::new(ffmpeg)
        .args(["-nostdin", "-v", "error", "-i"])
        .arg(input)
        .args(["-vn", "-ac", "1", "-ar"])
        .arg(WHISPER_SAMPLE_RATE.to_string())
        .args(["-f", "f32le", "-"])
        .output()
        .with_context(|| format!("failed to run {}", ffmpeg.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("ffmpeg exited with {}: {}", output.status, stderr.trim());
    }

    let samples = parse_f32le(&output.stdout)?;
    tracing::debug!(
        input = %input.display(),
        whisper_frames = samples.len(),
        "decoded media with ffmpeg"
    );
    Ok(samples)
}

/// Parse raw little-endian `f32` samples.
fn parse_f32le(bytes: &[u8]) -> Result<Vec<f32>> {
    if bytes.len() % 4 != 0 {
        bail!("ffmpeg output is not whole f32 samples ({} bytes)", bytes.len());
    }

    Ok(bytes
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect())
}
