use std::path::PathBuf;

use clap::Parser;

use mediascribe::ModelSize;
use mediascribe::RunConfig;
use mediascribe::config::{DEFAULT_MODELS_DIR, DEFAULT_OUTPUT_DIR};

#[derive(Parser, Debug)]
#[command(name = "mediascribe")]
#[command(about = "Transcribe audio/video to text & SRT using Whisper, with a progress bar")]
pub struct Params {
    /// Path to the input media file (audio or video).
    pub input: PathBuf,

    /// Whisper model size.
    #[arg(long = "model", value_enum, default_value_t = ModelSize::Small)]
    pub model: ModelSize,

    /// Language code (en, zh, fr, ...). Auto-detected when omitted.
    #[arg(long = "language")]
    pub language: Option<String>,

    /// Directory the transcript and subtitles are written into (created if missing).
    #[arg(long = "output-dir", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Run on the CPU even when a GPU is available.
    #[arg(long = "force-cpu", default_value_t = false)]
    pub force_cpu: bool,

    /// Directory ggml model files are loaded from.
    #[arg(long = "models-dir", default_value = DEFAULT_MODELS_DIR)]
    pub models_dir: PathBuf,

    /// Fail instead of downloading a missing model.
    #[arg(long = "no-download", default_value_t = false)]
    pub no_download: bool,
}

impl Params {
    pub fn into_config(self) -> RunConfig {
        RunConfig {
            input: self.input,
            model: self.model,
            language: self.language,
            output_dir: self.output_dir,
            force_cpu: self.force_cpu,
            models_dir: self.models_dir,
            allow_download: !self.no_download,
        }
    }
}
