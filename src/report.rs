//! User-facing milestone and progress reporting.
//!
//! A run announces its milestones (`[INFO]`, `[OK]`, `[WARN]` lines in the CLI) and forwards
//! whisper.cpp's progress callback through a [`Reporter`]. whisper.cpp invokes that callback from
//! inside inference, so reporters are shared behind an `Arc` and must be `Send + Sync`.

/// Receives milestones and progress from a run.
pub trait Reporter: Send + Sync {
    fn info(&self, message: &str);

    fn ok(&self, message: &str);

    fn warn(&self, message: &str);

    /// Transcription is starting. `total_seconds` is `0.0` when the duration is unknown.
    fn progress_started(&self, total_seconds: f64);

    /// whisper.cpp progress in percent (0-100).
    fn progress_percent(&self, percent: i32);

    /// Transcription returned; the indicator should show completion and close.
    fn progress_finished(&self);

    /// A model download is starting. `total_bytes` is `None` when the server doesn't say.
    fn download_started(&self, total_bytes: Option<u64>);

    /// `bytes` more bytes of the model arrived.
    fn download_progress(&self, bytes: u64);

    /// The download ended, successfully or not.
    fn download_finished(&self);
}

/// Sends milestones to `tracing` and ignores progress.
///
/// Useful for library consumers that don't drive a console.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn info(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn ok(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn warn(&self, message: &str) {
        tracing::warn!("{message}");
    }

    fn progress_started(&self, total_seconds: f64) {
        tracing::debug!(total_seconds, "transcription started");
    }

    fn progress_percent(&self, percent: i32) {
        tracing::trace!(percent, "transcription progress");
    }

    fn progress_finished(&self) {
        tracing::debug!("transcription finished");
    }

    fn download_started(&self, total_bytes: Option<u64>) {
        tracing::debug!(?total_bytes, "model download started");
    }

    fn download_progress(&self, bytes: u64) {
        tracing::trace!(bytes, "model download progress");
    }

    fn download_finished(&self) {
        tracing::debug!("model download finished");
    }
}
