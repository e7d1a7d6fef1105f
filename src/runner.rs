//! High-level API: one media file in, a transcript and subtitles out.
//!
//! `Runner` wires the pieces together in a single linear pass:
//! output dir → input check → device → model load → duration probe → decode → transcribe → write.
//!
//! Every collaborator with a side effect outside this crate (model loading, duration probing,
//! accelerator detection, console output) sits behind a trait so runs can be exercised without a
//! real model or GPU.

use std::path::Path;
use std::sync::Arc;

use chrono::Local;

use crate::backend::{Backend, BackendLoader};
use crate::backends::whisper::WhisperLoader;
use crate::config::RunConfig;
use crate::decoder::decode_file;
use crate::device::{AcceleratorProbe, CompiledAccelerators, select_device};
use crate::duration::{DurationProbe, MediaDurationProbe};
use crate::error::{Error, Result};
use crate::output::{OutputPaths, ensure_output_dir, write_outputs};
use crate::report::Reporter;

/// Runs transcriptions with a given set of collaborators.
pub struct Runner<L = WhisperLoader, D = MediaDurationProbe, A = CompiledAccelerators> {
    loader: L,
    duration_probe: D,
    accelerators: A,
    reporter: Arc<dyn Reporter>,
}

impl Runner {
    /// A runner backed by whisper.cpp, `ffprobe`/Symphonia duration probing and the accelerators
    /// compiled into this build.
    pub fn whisper(reporter: Arc<dyn Reporter>) -> Self {
        Self::new(
            WhisperLoader,
            MediaDurationProbe,
            CompiledAccelerators,
            reporter,
        )
    }
}

impl<L, D, A> Runner<L, D, A>
where
    L: BackendLoader,
    D: DurationProbe,
    A: AcceleratorProbe,
{
    pub fn new(loader: L, duration_probe: D, accelerators: A, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            loader,
            duration_probe,
            accelerators,
            reporter,
        }
    }

    /// Transcribe `config.input` and write `<stem>.<timestamp>.{txt,srt}` into
    /// `config.output_dir`.
    ///
    /// Fails with [`Error::InputNotFound`] before any model work if the input is not a regular
    /// file. Duration probing failures only degrade the progress display.
    pub fn run(&self, config: &RunConfig) -> Result<OutputPaths> {
        let started_at = Local::now();

        ensure_output_dir(&config.output_dir)?;
        validate_input(&config.input)?;

        let device = select_device(&self.accelerators, config.force_cpu);
        self.reporter.info(&format!(
            "Loading model {} on {} (half_precision={}) …",
            config.model, device.device, device.half_precision
        ));
        let mut backend = self.loader.load(config, device, self.reporter.as_ref())?;

        let total_seconds = self.probe_duration(&config.input);

        let samples = decode_file(&config.input)?;

        self.reporter.progress_started(total_seconds);
        let result = backend.transcribe(config, &samples, Arc::clone(&self.reporter));
        self.reporter.progress_finished();
        let result = result?;

        let paths = OutputPaths::for_input(&config.output_dir, &config.input, &started_at);
        write_outputs(&paths, &result)?;

        self.reporter
            .ok(&format!("Wrote transcript: {}", paths.txt.display()));
        self.reporter
            .ok(&format!("Wrote subtitles: {}", paths.srt.display()));

        Ok(paths)
    }

    /// Duration in seconds, or `0.0` (unknown) when probing fails.
    fn probe_duration(&self, input: &Path) -> f64 {
        match self.duration_probe.duration_seconds(input) {
            Ok(seconds) if seconds.is_finite() && seconds > 0.0 => seconds,
            Ok(seconds) => {
                self.reporter
                    .warn(&format!("Unable to get audio duration: reported {seconds}s"));
                0.0
            }
            Err(err) => {
                self.reporter
                    .warn(&format!("Unable to get audio duration: {err:#}"));
                0.0
            }
        }
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }
}

fn validate_input(input: &Path) -> Result<()> {
    if input.is_file() {
        Ok(())
    } else {
        Err(Error::input_not_found(input))
    }
}
