use std::sync::Arc;

use anyhow::Result;

use crate::config::RunConfig;
use crate::device::DeviceSelection;
use crate::report::Reporter;
use crate::segments::TranscriptionResult;

/// A loaded speech-to-text model used by [`crate::Runner`].
///
/// A backend turns mono `f32` samples at 16 kHz into a [`TranscriptionResult`] in one blocking
/// call, forwarding whatever progress it can to `reporter`.
pub trait Backend {
    fn transcribe(
        &mut self,
        config: &RunConfig,
        samples: &[f32],
        reporter: Arc<dyn Reporter>,
    ) -> Result<TranscriptionResult>;
}

/// Loads a [`Backend`] for a run's model size on a chosen device.
///
/// Loading is the expensive step (model weights, device buffers, possibly a download), so it is
/// kept separate from transcription. Loaders announce downloads through `reporter`.
pub trait BackendLoader {
    type Backend: Backend;

    fn load(
        &self,
        config: &RunConfig,
        device: DeviceSelection,
        reporter: &dyn Reporter,
    ) -> Result<Self::Backend>;
}
