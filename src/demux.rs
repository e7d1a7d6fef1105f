// src/demux.rs

//! Container probing for Symphonia.
//!
//! Responsibilities:
//! - Open a media file and select its default audio track
//! - Read the track's duration from container metadata
//! - Iterate packets, treating IO errors as end-of-stream

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use symphonia::core::codecs::CODEC_TYPE_NULL;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader, Packet, Track};
use symphonia::core::io::{MediaSourceStream, MediaSourceStreamOptions};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Open `path` and pick its default audio track.
///
/// A `File` is a seekable source, so containers that keep their index at the end (MP4/MOV with a
/// trailing `moov` atom) probe fine. The file extension is passed as a probe hint.
///
/// Track selection policy: the first track with a real codec and a known sample rate.
pub fn open_media(path: &Path) -> Result<(Box<dyn FormatReader>, Track)> {
    let file =
        File::open(path).with_context(|| format!("failed to open media: {}", path.display()))?;

    let mss_opts = MediaSourceStreamOptions {
        // Symphonia expects a power-of-two buffer > 32KiB.
        buffer_len: 256 * 1024,
    };
    let mss = MediaSourceStream::new(Box::new(file), mss_opts);

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|ext| ext.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| anyhow!(e))
        .with_context(|| format!("failed to probe media: {}", path.display()))?;

    let format = probed.format;
    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL && t.codec_params.sample_rate.is_some())
        .cloned()
        .ok_or_else(|| anyhow!("no audio track found in {}", path.display()))?;

    Ok((format, track))
}

/// Duration of a track in seconds, from its frame count and sample rate.
pub fn track_duration_seconds(track: &Track) -> Result<f64> {
    let params = &track.codec_params;
    let frames = params
        .n_frames
        .ok_or_else(|| anyhow!("container does not report a frame count"))?;
    let rate = params
        .sample_rate
        .filter(|rate| *rate > 0)
        .ok_or_else(|| anyhow!("container does not report a sample rate"))?;

    Ok(frames as f64 / f64::from(rate))
}

/// Read the next packet. `Ok(None)` means the stream ended.
pub fn next_packet(format: &mut Box<dyn FormatReader>) -> Result<Option<Packet>> {
    match format.next_packet() {
        Ok(p) => Ok(Some(p)),
        Err(SymphoniaError::IoError(_)) => Ok(None),
        Err(e) => Err(anyhow!(e)).context("failed reading packet"),
    }
}
