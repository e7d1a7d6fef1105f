use std::path::Path;

use anyhow::{Context, Result};
use whisper_rs::{WhisperContext, WhisperContextParameters};

use crate::device::DeviceSelection;

use super::logging::route_whisper_logging;

/// Load a ggml model onto the selected device.
pub(super) fn load_context(model_path: &Path, device: DeviceSelection) -> Result<WhisperContext> {
    route_whisper_logging();

    let path = model_path
        .to_str()
        .with_context(|| format!("model path is not valid UTF-8: {}", model_path.display()))?;

    let mut ctx_params = WhisperContextParameters::default();
    ctx_params
        .use_gpu(device.use_gpu())
        .flash_attn(device.half_precision);

    WhisperContext::new_with_params(path, ctx_params)
        .with_context(|| format!("failed to load model from path: {path}"))
}
