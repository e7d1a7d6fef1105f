use std::sync::Arc;

use anyhow::{Context, Result};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperSegment};

use crate::report::Reporter;
use crate::segments::{Segment, centiseconds_to_seconds};

/// Run one `whisper_full` pass over `samples` and collect its segments.
pub(super) fn run_whisper_full(
    ctx: &WhisperContext,
    language: Option<&str>,
    samples: &[f32],
    reporter: Arc<dyn Reporter>,
) -> Result<Vec<Segment>> {
    let params = build_full_params(language, reporter);

    let mut state = ctx
        .create_state()
        .context("failed to create whisper state")?;

    state
        .full(params, samples)
        .context("failed to run whisper full()")?;

    let segments = state.as_iter().map(to_segment).collect::<Result<Vec<_>>>()?;
    Ok(segments)
}

fn to_segment(segment: WhisperSegment) -> Result<Segment> {
    let text = segment
        .to_str()
        .context("failed to get segment text")?
        .to_owned();

    Ok(Segment {
        start_seconds: centiseconds_to_seconds(segment.start_timestamp()),
        end_seconds: centiseconds_to_seconds(segment.end_timestamp()),
        text,
    })
}

fn build_full_params<'a>(
    language: Option<&'a str>,
    reporter: Arc<dyn Reporter>,
) -> FullParams<'a, 'a> {
    let mut params = FullParams::new(SamplingStrategy::BeamSearch {
        beam_size: 5,
        patience: 1.0,
    });

    params.set_n_threads(num_cpus::get() as i32);
    params.set_translate(false);
    // `None` lets whisper.cpp auto-detect the language.
    params.set_language(language);
    // Condition each window on the previous one's text, like a whole-file transcription should.
    params.set_no_context(false);
    params.set_single_segment(false);

    params.set_print_progress(false);
    params.set_print_special(false);
    params.set_print_realtime(false);
    params.set_print_timestamps(false);

    params.set_progress_callback_safe(move |percent: i32| reporter.progress_percent(percent));

    params
}
