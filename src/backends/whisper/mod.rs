use std::sync::Arc;

use anyhow::Result;
use whisper_rs::WhisperContext;

use crate::backend::{Backend, BackendLoader};
use crate::config::RunConfig;
use crate::device::DeviceSelection;
use crate::model_store::ModelStore;
use crate::report::Reporter;
use crate::segments::{TranscriptionResult, UNDETERMINED_LANGUAGE};

mod ctx;
mod logging;
mod segments;

use segments::run_whisper_full;

/// Built-in backend powered by `whisper-rs` / `whisper.cpp`.
pub struct WhisperBackend {
    ctx: WhisperContext,
    device: DeviceSelection,
}

impl WhisperBackend {
    /// Load a ggml model file onto `device`.
    pub fn new(model_path: &std::path::Path, device: DeviceSelection) -> Result<Self> {
        let ctx = ctx::load_context(model_path, device)?;
        Ok(Self { ctx, device })
    }

}

impl Backend for WhisperBackend {
    fn transcribe(
        &mut self,
        config: &RunConfig,
        samples: &[f32],
        reporter: Arc<dyn Reporter>,
    ) -> Result<TranscriptionResult> {
        let language = config.language_hint();
        let language_code = language.unwrap_or(UNDETERMINED_LANGUAGE);

        if samples.is_empty() {
            tracing::warn!("no audio samples decoded; skipping inference");
            return Ok(TranscriptionResult::from_segments(Vec::new(), language_code));
        }

        let segments = run_whisper_full(&self.ctx, language, samples, reporter)?;
        tracing::debug!(
            segments = segments.len(),
            language = language_code,
            device = %self.device.device,
            "whisper finished"
        );

        Ok(TranscriptionResult::from_segments(segments, language_code))
    }
}

/// Resolves the run's model in a [`ModelStore`] (downloading it if allowed) and loads it.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhisperLoader;

impl BackendLoader for WhisperLoader {
    type Backend = WhisperBackend;

    fn load(
        &self,
        config: &RunConfig,
        device: DeviceSelection,
        reporter: &dyn Reporter,
    ) -> Result<WhisperBackend> {
        let store = ModelStore::new(&config.models_dir);
        let model_path = store.resolve(config.model, config.allow_download, reporter)?;

        tracing::info!(
            model = %config.model,
            path = %model_path.display(),
            device = %device.device,
            half_precision = device.half_precision,
            "loading whisper model"
        );
        WhisperBackend::new(&model_path, device)
    }
}
