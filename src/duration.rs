//! Best-effort media duration lookup.
//!
//! The duration only sizes the progress indicator, so callers treat any error here as "unknown"
//! rather than failing the run.

use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;

use crate::demux::{open_media, track_duration_seconds};

/// Looks up the total duration of a media file in seconds.
pub trait DurationProbe {
    fn duration_seconds(&self, path: &Path) -> Result<f64>;
}

/// Asks `ffprobe` first and falls back to container metadata read with Symphonia.
#[derive(Debug, Clone, Copy, Default)]
pub struct MediaDurationProbe;

impl DurationProbe for MediaDurationProbe {
    fn duration_seconds(&self, path: &Path) -> Result<f64> {
        let ffprobe_err = match ffprobe_duration(path) {
            Ok(seconds) => return Ok(seconds),
            Err(err) => err,
        };
        tracing::debug!(
            path = %path.display(),
            error = %format!("{ffprobe_err:#}"),
            "ffprobe unavailable, reading container metadata"
        );

        container_duration(path).map_err(|err| err.context(format!("ffprobe: {ffprobe_err:#}")))
    }
}

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: FfprobeFormat,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    #[serde(default)]
    duration: Option<String>,
}

/// Run `ffprobe` (located on `PATH`) and read `format.duration`.
pub fn ffprobe_duration(path: &Path) -> Result<f64> {
    let ffprobe = which::which("ffprobe").context("ffprobe not found on PATH")?;

    let output = Command::new(&ffprobe)
        .args(["-v", "error", "-show_entries", "format=duration", "-of", "json"])
        .arg(path)
        .output()
        .with_context(|| format!("failed to run {}", ffprobe.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("ffprobe exited with {}: {}", output.status, stderr.trim());
    }

    parse_ffprobe_duration(&output.stdout)
}

/// Parse the JSON `ffprobe -show_entries format=duration -of json` prints.
pub fn parse_ffprobe_duration(json: &[u8]) -> Result<f64> {
    let parsed: FfprobeOutput =
        serde_json::from_slice(json).context("failed to parse ffprobe output")?;

    let raw = parsed
        .format
        .duration
        .ok_or_else(|| anyhow!("ffprobe did not report a duration"))?;
    let seconds: f64 = raw
        .trim()
        .parse()
        .with_context(|| format!("invalid duration from ffprobe: {raw:?}"))?;

    if !seconds.is_finite() || seconds < 0.0 {
        bail!("invalid duration from ffprobe: {raw:?}");
    }
    Ok(seconds)
}

/// Read the default audio track's duration from the container.
pub fn container_duration(path: &Path) -> Result<f64> {
    let (_format, track) = open_media(path)?;
    track_duration_seconds(&track)
}
