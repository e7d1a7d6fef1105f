#![allow(dead_code)]

use std::f32::consts::PI;
use std::path::Path;
use std::sync::{Arc, Mutex};

use mediascribe::{
    AcceleratorProbe, Backend, BackendLoader, DeviceSelection, DurationProbe, Reporter, RunConfig,
    Segment, TranscriptionResult,
};

/// Write a sine tone as a 16-bit PCM WAV file.
pub fn write_wav(path: &Path, seconds: f32, sample_rate: u32, channels: u16) -> anyhow::Result<()> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)?;
    let frames = (seconds * sample_rate as f32) as u32;
    for i in 0..frames {
        let t = i as f32 / sample_rate as f32;
        let sample = (t * 440.0 * 2.0 * PI).sin() * 0.3;
        for _ in 0..channels {
            writer.write_sample((sample * i16::MAX as f32) as i16)?;
        }
    }
    writer.finalize()?;
    Ok(())
}

pub fn segments() -> Vec<Segment> {
    vec![
        Segment {
            start_seconds: 0.0,
            end_seconds: 2.5,
            text: " Treat.".to_owned(),
        },
        Segment {
            start_seconds: 2.5,
            end_seconds: 4.75,
            text: " Yo. Self. ".to_owned(),
        },
    ]
}

/// A loader whose backends return canned segments.
#[derive(Default)]
pub struct FakeLoader {
    pub loads: Mutex<Vec<DeviceSelection>>,
    pub fail_transcription: bool,
}

impl FakeLoader {
    pub fn failing() -> Self {
        Self {
            fail_transcription: true,
            ..Self::default()
        }
    }

    pub fn loads(&self) -> Vec<DeviceSelection> {
        self.loads.lock().expect("loads lock").clone()
    }
}

impl BackendLoader for FakeLoader {
    type Backend = FakeBackend;

    fn load(
        &self,
        _config: &RunConfig,
        device: DeviceSelection,
        _reporter: &dyn Reporter,
    ) -> anyhow::Result<FakeBackend> {
        self.loads.lock().expect("loads lock").push(device);
        Ok(FakeBackend {
            fail: self.fail_transcription,
        })
    }
}

pub struct FakeBackend {
    fail: bool,
}

impl Backend for FakeBackend {
    fn transcribe(
        &mut self,
        config: &RunConfig,
        samples: &[f32],
        reporter: Arc<dyn Reporter>,
    ) -> anyhow::Result<TranscriptionResult> {
        anyhow::ensure!(!samples.is_empty(), "expected decoded samples");
        if self.fail {
            anyhow::bail!("out of memory");
        }

        reporter.progress_percent(50);
        reporter.progress_percent(100);
        Ok(TranscriptionResult::from_segments(
            segments(),
            config.language_hint().unwrap_or("und"),
        ))
    }
}

pub struct Accelerator(pub bool);

impl AcceleratorProbe for Accelerator {
    fn accelerator_available(&self) -> bool {
        self.0
    }
}

/// `Some(seconds)` succeeds; `None` fails like a missing `ffprobe`.
pub struct FixedDuration(pub Option<f64>);

impl DurationProbe for FixedDuration {
    fn duration_seconds(&self, _path: &Path) -> anyhow::Result<f64> {
        self.0
            .ok_or_else(|| anyhow::anyhow!("ffprobe not found on PATH"))
    }
}

#[derive(Default)]
pub struct RecordingReporter {
    pub events: Mutex<Vec<String>>,
}

impl RecordingReporter {
    fn push(&self, event: String) {
        self.events.lock().expect("events lock").push(event);
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().expect("events lock").clone()
    }
}

impl Reporter for RecordingReporter {
    fn info(&self, message: &str) {
        self.push(format!("info: {message}"));
    }

    fn ok(&self, message: &str) {
        self.push(format!("ok: {message}"));
    }

    fn warn(&self, message: &str) {
        self.push(format!("warn: {message}"));
    }

    fn progress_started(&self, total_seconds: f64) {
        self.push(format!("started: {total_seconds}"));
    }

    fn progress_percent(&self, percent: i32) {
        self.push(format!("percent: {percent}"));
    }

    fn progress_finished(&self) {
        self.push("finished".to_owned());
    }

    fn download_started(&self, total_bytes: Option<u64>) {
        self.push(format!("download started: {total_bytes:?}"));
    }

    fn download_progress(&self, bytes: u64) {
        self.push(format!("download progress: {bytes}"));
    }

    fn download_finished(&self) {
        self.push("download finished".to_owned());
    }
}
