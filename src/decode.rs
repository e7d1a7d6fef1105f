//! Symphonia decode loop for one audio track.
//!
//! Packet policy:
//! - packets of other tracks (video, subtitles, secondary audio) are ignored
//! - `DecodeError` means a corrupt frame; it is counted and skipped
//! - `IoError` from the decoder is treated as end-of-stream
//! - anything else is fatal

use anyhow::{Context, Result, anyhow};
use symphonia::core::audio::AudioBufferRef;
use symphonia::core::codecs::{Decoder, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatReader, Track};

use crate::demux::next_packet;

/// Packet counts from one pass over a track.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DecodeStats {
    pub decoded: usize,
    pub skipped: usize,
}

/// Create a decoder for `track` from Symphonia's default codec registry.
pub fn make_decoder_for_track(track: &Track) -> Result<Box<dyn Decoder>> {
    symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| anyhow!(e))
        .with_context(|| format!("failed to create decoder for audio track {}", track.id))
}

/// Decode every packet of `track`, handing each PCM buffer to `on_decoded`.
pub fn decode_track(
    format: &mut Box<dyn FormatReader>,
    track: &Track,
    mut on_decoded: impl FnMut(AudioBufferRef<'_>) -> Result<()>,
) -> Result<DecodeStats> {
    let mut decoder = make_decoder_for_track(track)?;
    let mut stats = DecodeStats::default();

    while let Some(packet) = next_packet(format)? {
        if packet.track_id() != track.id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(buf) => {
                on_decoded(buf)?;
                stats.decoded += 1;
            }
            Err(SymphoniaError::DecodeError(msg)) => {
                tracing::debug!(reason = msg, ts = packet.ts(), "skipping undecodable packet");
                stats.skipped += 1;
            }
            Err(SymphoniaError::IoError(_)) => break,
            Err(e) => return Err(anyhow!(e)).context("decoder failure"),
        }
    }

    Ok(stats)
}
