//! Output naming and writing.
//!
//! Each run writes `<stem>.<YYYYMMDD-HHMMSS>.txt` and `<stem>.<YYYYMMDD-HHMMSS>.srt`. Both files
//! are staged as temp files in the output directory and renamed into place at the end, so a run
//! leaves either both outputs or neither.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone};
use tempfile::NamedTempFile;

use crate::segment_encoder::SegmentEncoder;
use crate::segments::TranscriptionResult;
use crate::srt_encoder::SrtEncoder;

/// `strftime` format of the run timestamp embedded in output names.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Stem used when the input path has no usable file name.
const FALLBACK_STEM: &str = "transcript";

/// The pair of files a run produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub txt: PathBuf,
    pub srt: PathBuf,
}

impl OutputPaths {
    /// Derive output paths from the input's file stem and the run's start time.
    pub fn for_input<Tz>(output_dir: &Path, input: &Path, started_at: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let stem = input
            .file_stem()
            .map(|stem| stem.to_string_lossy())
            .filter(|stem| !stem.is_empty())
            .unwrap_or(FALLBACK_STEM.into());
        let base = format!("{stem}.{}", started_at.format(TIMESTAMP_FORMAT));

        Self {
            txt: output_dir.join(format!("{base}.txt")),
            srt: output_dir.join(format!("{base}.srt")),
        }
    }
}

/// Create the output directory (and parents). Succeeds if it already exists.
pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output dir: {}", dir.display()))
}

/// Write the transcript and subtitles for `result` to `paths`.
///
/// Existing files at the target paths are replaced. If the subtitles can't be moved into place
/// after the transcript was, the transcript is removed again.
pub fn write_outputs(paths: &OutputPaths, result: &TranscriptionResult) -> Result<()> {
    let txt_tmp = stage_transcript(paths, result)?;
    let srt_tmp = stage_subtitles(paths, result)?;

    txt_tmp
        .persist(&paths.txt)
        .with_context(|| format!("failed to move transcript into place: {}", paths.txt.display()))?;

    if let Err(err) = srt_tmp.persist(&paths.srt) {
        if let Err(cleanup_err) = fs::remove_file(&paths.txt) {
            tracing::warn!(
                path = %paths.txt.display(),
                error = %cleanup_err,
                "failed to remove transcript after subtitle write failure"
            );
        }
        return Err(err)
            .with_context(|| format!("failed to move subtitles into place: {}", paths.srt.display()));
    }

    tracing::info!(
        txt = %paths.txt.display(),
        srt = %paths.srt.display(),
        segments = result.segments.len(),
        "wrote outputs"
    );
    Ok(())
}

fn staging_dir(target: &Path) -> &Path {
    match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn stage_transcript(paths: &OutputPaths, result: &TranscriptionResult) -> Result<NamedTempFile> {
    let dir = staging_dir(&paths.txt);
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create temp file in {}", dir.display()))?;

    tmp.write_all(result.plain_text().as_bytes())
        .context("failed to write transcript")?;
    tmp.as_file().sync_all().context("failed to sync transcript")?;
    Ok(tmp)
}

fn stage_subtitles(paths: &OutputPaths, result: &TranscriptionResult) -> Result<NamedTempFile> {
    let dir = staging_dir(&paths.srt);
    let tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create temp file in {}", dir.display()))?;

    {
        let mut encoder = SrtEncoder::new(BufWriter::new(tmp.as_file()));
        encoder
            .write_all_segments(&result.segments)
            .context("failed to write subtitles")?;
    }

    tmp.as_file().sync_all().context("failed to sync subtitles")?;
    Ok(tmp)
}
