use std::fmt;
use std::path::PathBuf;

/// Default directory transcripts and subtitles are written into.
pub const DEFAULT_OUTPUT_DIR: &str = "./transcripts";

/// Default directory ggml model files are looked up in (and downloaded into).
pub const DEFAULT_MODELS_DIR: &str = "./models";

/// Whisper model sizes accepted by `--model`.
///
/// Larger models are slower and need more memory, but transcribe more accurately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ModelSize {
    Tiny,
    Base,
    #[default]
    Small,
    Medium,
    Large,
}

impl ModelSize {
    /// The whisper.cpp model name this size resolves to.
    ///
    /// `large` follows the current generation of large models.
    pub fn model_name(self) -> &'static str {
        match self {
            ModelSize::Tiny => "tiny",
            ModelSize::Base => "base",
            ModelSize::Small => "small",
            ModelSize::Medium => "medium",
            ModelSize::Large => "large-v3",
        }
    }

    /// The ggml file name whisper.cpp publishes for this size (e.g. `ggml-small.bin`).
    pub fn file_name(self) -> String {
        format!("ggml-{}.bin", self.model_name())
    }
}

impl fmt::Display for ModelSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModelSize::Tiny => "tiny",
            ModelSize::Base => "base",
            ModelSize::Small => "small",
            ModelSize::Medium => "medium",
            ModelSize::Large => "large",
        };
        f.write_str(name)
    }
}

/// Configuration for a single transcription run.
///
/// This is *library-level configuration*, not CLI flags directly. The binary maps its arguments
/// into this type, and tests or other frontends can build it programmatically. A run only ever
/// borrows it, so it stays fixed once constructed.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Media file to transcribe (any audio or video container symphonia can demux).
    pub input: PathBuf,

    /// Which Whisper model to load.
    pub model: ModelSize,

    /// Optional language hint (e.g. `"en"`, `"zh"`).
    ///
    /// When `None`, Whisper auto-detects the spoken language.
    pub language: Option<String>,

    /// Directory the `.txt` and `.srt` outputs are written into (created if missing).
    pub output_dir: PathBuf,

    /// Run on the CPU even when an accelerator is available.
    pub force_cpu: bool,

    /// Directory ggml model files are resolved from.
    pub models_dir: PathBuf,

    /// Whether a missing model may be downloaded into `models_dir`.
    pub allow_download: bool,
}

impl RunConfig {
    /// Build a configuration for `input` with every other setting at its default.
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            model: ModelSize::default(),
            language: None,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            force_cpu: false,
            models_dir: PathBuf::from(DEFAULT_MODELS_DIR),
            allow_download: true,
        }
    }

    /// The language hint, with blank values treated as "auto-detect".
    pub fn language_hint(&self) -> Option<&str> {
        self.language
            .as_deref()
            .map(str::trim)
            .filter(|lang| !lang.is_empty())
    }
}
