/// Language code reported when Whisper auto-detected the language.
///
/// `"und"` ("undetermined") is the usual convention in language tagging systems.
pub const UNDETERMINED_LANGUAGE: &str = "und";

/// A time-bounded span of transcript text.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub start_seconds: f32,
    pub end_seconds: f32,
    pub text: String,
}

/// Everything a transcription produces: the full text plus its time-aligned segments.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptionResult {
    /// Full transcript, the concatenation of every segment's text.
    pub text: String,

    /// Segments in playback order.
    pub segments: Vec<Segment>,

    /// Language hint the run used, or [`UNDETERMINED_LANGUAGE`].
    pub language_code: String,
}

impl TranscriptionResult {
    /// Build a result from segments, deriving the full text.
    pub fn from_segments(segments: Vec<Segment>, language_code: impl Into<String>) -> Self {
        let text = segments.iter().map(|s| s.text.as_str()).collect();
        Self {
            text,
            segments,
            language_code: language_code.into(),
        }
    }

    /// Transcript as written to the `.txt` file: trimmed, with exactly one trailing newline.
    pub fn plain_text(&self) -> String {
        format!("{}\n", self.text.trim())
    }
}

/// Convert a whisper.cpp timestamp (centiseconds, `-1` when unknown) to seconds.
pub(crate) fn centiseconds_to_seconds(value: i64) -> f32 {
    if value < 0 { 0.0 } else { value as f32 / 100.0 }
}
