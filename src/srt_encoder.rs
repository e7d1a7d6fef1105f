use anyhow::Result;
use std::io::Write;

use crate::segment_encoder::SegmentEncoder;
use crate::segments::Segment;

/// A `SegmentEncoder` that writes SubRip (`.srt`) subtitles.
///
/// Each segment becomes one cue:
///
/// ```text
/// 1
/// 00:00:00,000 --> 00:00:02,500
/// Hello there.
///
/// ```
///
/// Cues are numbered from 1. Cue text is trimmed and any `-->` inside it is rewritten to `->` so
/// it can't be mistaken for a timing line.
pub struct SrtEncoder<W: Write> {
    w: W,

    /// Number of the next cue.
    next_index: usize,

    closed: bool,
}

impl<W: Write> SrtEncoder<W> {
    pub fn new(w: W) -> Self {
        Self {
            w,
            next_index: 1,
            closed: false,
        }
    }

    /// Number of cues written so far.
    pub fn cues_written(&self) -> usize {
        self.next_index - 1
    }
}

impl<W: Write> SegmentEncoder for SrtEncoder<W> {
    fn write_segment(&mut self, seg: &Segment) -> Result<()> {
        if self.closed {
            anyhow::bail!("cannot write segment: encoder is already closed");
        }

        let start = format_timestamp_srt(seg.start_seconds);
        let end = format_timestamp_srt(seg.end_seconds);
        let text = seg.text.trim().replace("-->", "->");

        writeln!(&mut self.w, "{}", self.next_index)?;
        writeln!(&mut self.w, "{start} --> {end}")?;
        writeln!(&mut self.w, "{text}")?;
        writeln!(&mut self.w)?;

        self.next_index += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }

        self.w.flush()?;
        self.closed = true;
        Ok(())
    }
}

/// Format seconds as an SRT timestamp (`HH:MM:SS,mmm`), rounded to the nearest millisecond.
///
/// Negative and non-finite inputs clamp to zero.
pub fn format_timestamp_srt(seconds: f32) -> String {
    let total_ms = if seconds.is_finite() && seconds > 0.0 {
        (f64::from(seconds) * 1000.0).round() as u64
    } else {
        0
    };

    let ms = total_ms % 1000;
    let total_s = total_ms / 1000;
    let s = total_s % 60;
    let total_m = total_s / 60;
    let m = total_m % 60;
    let h = total_m / 60;

    format!("{h:02}:{m:02}:{s:02},{ms:03}")
}
