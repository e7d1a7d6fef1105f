//! `mediascribe`: transcribe audio and video files to plain text and SRT subtitles with Whisper.
//!
//! This crate provides:
//! - Run configuration and compute device selection
//! - Media decoding with Symphonia (and `ffmpeg`, when installed, for the rest) into
//!   Whisper-ready samples
//! - Best-effort duration probing for progress display
//! - A whisper.cpp backend with on-demand model download
//! - Transcript and SRT writers that leave both outputs or neither
//!
//! Most consumers should start with [`Runner`] and [`RunConfig`].

pub mod error;

// High-level API.
pub mod config;
pub mod runner;

// Device, model and backend plumbing.
pub mod backend;
pub mod backends;
pub mod device;
pub mod model_store;

// Media decoding and probing.
pub mod audio_pipeline;
pub mod decode;
pub mod decoder;
pub mod demux;
pub mod duration;
pub mod ffmpeg;

// Transcription results and outputs.
pub mod output;
pub mod segment_encoder;
pub mod segments;
pub mod srt_encoder;

// Progress and milestone reporting.
pub mod progress;
pub mod report;

#[cfg(feature = "logging")]
pub mod logging;

pub use backend::{Backend, BackendLoader};
pub use backends::whisper::{WhisperBackend, WhisperLoader};
pub use config::{ModelSize, RunConfig};
pub use device::{AcceleratorProbe, Device, DeviceSelection};
pub use duration::DurationProbe;
pub use error::{Error, Result};
pub use output::OutputPaths;
pub use progress::ProgressState;
pub use report::Reporter;
pub use runner::Runner;
pub use segments::{Segment, TranscriptionResult};

/// Initialize logging for binaries.
#[cfg(feature = "logging")]
pub fn init_logging() {
    logging::init();
}
