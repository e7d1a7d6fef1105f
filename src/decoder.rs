// src/decoder.rs

//! Decode a media file (audio or video container) into mono `f32` samples at 16 kHz.
//!
//! Orchestration only:
//! - `demux` opens the container and picks the audio track
//! - `decode` runs the codec over the track's packets
//! - `audio_pipeline` downmixes and resamples
//! - `ffmpeg` takes over for inputs Symphonia cannot open or decode

use std::path::Path;

use anyhow::{Context, Result, anyhow};

use crate::audio_pipeline::{MonoAccumulator, WHISPER_SAMPLE_RATE};
use crate::decode::decode_track;
use crate::demux::open_media;
use crate::ffmpeg::{decode_with_ffmpeg, find_ffmpeg};

/// Decode the default audio track of `path` into Whisper-ready samples, using `ffmpeg` from
/// `PATH` for inputs Symphonia cannot handle.
pub fn decode_file(path: &Path) -> Result<Vec<f32>> {
    decode_file_with(path, find_ffmpeg().as_deref())
}

/// Like [`decode_file`], with an explicit `ffmpeg` binary (or none) for the fallback.
pub fn decode_file_with(path: &Path, ffmpeg: Option<&Path>) -> Result<Vec<f32>> {
    let symphonia_err = match decode_with_symphonia(path) {
        Ok(samples) => return Ok(samples),
        Err(err) => err,
    };

    let Some(ffmpeg) = ffmpeg else {
        return Err(symphonia_err);
    };
    if !path.is_file() {
        return Err(symphonia_err);
    }

    tracing::debug!(
        path = %path.display(),
        error = %format!("{symphonia_err:#}"),
        "symphonia could not decode input, retrying with ffmpeg"
    );
    decode_with_ffmpeg(ffmpeg, path).map_err(|ffmpeg_err| {
        anyhow!(
            "failed to decode {}: {symphonia_err:#}; ffmpeg: {ffmpeg_err:#}",
            path.display()
        )
    })
}

fn decode_with_symphonia(path: &Path) -> Result<Vec<f32>> {
    let (mut format, track) = open_media(path)?;
    let mut acc = MonoAccumulator::new();

    let stats = decode_track(&mut format, &track, |decoded| {
        acc.push_decoded(&decoded)
            .context("failed to normalize decoded samples")
    })?;

    let source_rate = acc.source_rate();
    let source_frames = acc.frames();
    let samples = acc.finish()?;

    tracing::debug!(
        path = %path.display(),
        ?source_rate,
        source_frames,
        packets = stats.decoded,
        skipped_packets = stats.skipped,
        whisper_frames = samples.len(),
        seconds = samples.len() as f64 / f64::from(WHISPER_SAMPLE_RATE),
        "decoded media"
    );

    Ok(samples)
}
