//! Resolve Whisper models on disk, downloading missing ones.
//!
//! Models are whisper.cpp ggml files named `ggml-<model>.bin`, kept in a single directory. When a
//! model is missing and downloads are allowed, it is fetched from whisper.cpp's Hugging Face
//! repository.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use crate::config::ModelSize;
use crate::report::Reporter;

/// Base URL of whisper.cpp's ggml model files.
const MODEL_BASE_URL: &str = "https://huggingface.co/ggerganov/whisper.cpp/resolve/main";

/// A directory of ggml model files.
#[derive(Debug, Clone)]
pub struct ModelStore {
    dir: PathBuf,
}

impl ModelStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Where the model for `size` lives (whether or not it exists yet).
    pub fn model_path(&self, size: ModelSize) -> PathBuf {
        self.dir.join(size.file_name())
    }

    /// Download URL for `size`.
    pub fn model_url(size: ModelSize) -> String {
        format!("{MODEL_BASE_URL}/{}", size.file_name())
    }

    /// Return the path of the model for `size`, downloading it first if needed.
    ///
    /// Downloads are announced and tracked through `reporter`.
    pub fn resolve(
        &self,
        size: ModelSize,
        allow_download: bool,
        reporter: &dyn Reporter,
    ) -> Result<PathBuf> {
        let path = self.model_path(size);
        if path.is_file() {
            tracing::debug!(path = %path.display(), "using cached model");
            return Ok(path);
        }

        if !allow_download {
            bail!(
                "model '{size}' not found at {} (downloads are disabled)",
                path.display()
            );
        }

        fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create models dir: {}", self.dir.display()))?;

        let url = Self::model_url(size);
        reporter.info(&format!("Downloading model {url} …"));
        download::download_model(&url, &path, reporter)?;
        Ok(path)
    }
}

#[cfg(feature = "download")]
mod download {
    use std::fs;
    use std::io::{Read, Write};
    use std::path::{Path, PathBuf};

    use anyhow::{Context, Result};
    use reqwest::blocking::Client;

    use crate::report::Reporter;

    pub(super) fn download_model(url: &str, dest_path: &Path, reporter: &dyn Reporter) -> Result<()> {
        tracing::info!(url, dest = %dest_path.display(), "downloading model");

        let client = Client::builder()
            .user_agent(concat!("mediascribe/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;

        let resp = client
            .get(url)
            .send()
            .with_context(|| format!("request failed: {url}"))?
            .error_for_status()
            .with_context(|| format!("download failed (bad status): {url}"))?;

        let total = resp.content_length();
        download_to_path_with_reader(resp, total, dest_path, reporter)
    }

    /// Stream `reader` into `dest_path.part`, fsync, then rename into place.
    ///
    /// The `.part` file is removed if anything fails.
    pub(super) fn download_to_path_with_reader<R: Read>(
        mut reader: R,
        total_bytes: Option<u64>,
        dest_path: &Path,
        reporter: &dyn Reporter,
    ) -> Result<()> {
        reporter.download_started(total_bytes.filter(|total| *total > 0));

        let tmp_path = PathBuf::from(format!("{}.part", dest_path.display()));

        let result = (|| -> Result<()> {
            let mut file = fs::File::create(&tmp_path)
                .with_context(|| format!("failed to create temp file: {}", tmp_path.display()))?;

            let mut buf = [0u8; 64 * 1024];
            loop {
                let n = reader.read(&mut buf).context("failed reading model download")?;
                if n == 0 {
                    break;
                }
                file.write_all(&buf[..n])?;
                reporter.download_progress(n as u64);
            }

            file.sync_all()?;
            fs::rename(&tmp_path, dest_path)
                .with_context(|| format!("failed to move into place: {}", dest_path.display()))?;
            Ok(())
        })();

        reporter.download_finished();
        if result.is_err() {
            let _ = fs::remove_file(&tmp_path);
        }

        result
    }

    #[cfg(test)]
    mod tests {
        use std::sync::Mutex;

        use super::*;
        use crate::report::TracingReporter;

        /// Records download callbacks as `(started, bytes, finished)`.
        #[derive(Default)]
        struct DownloadEvents(Mutex<(Option<Option<u64>>, u64, usize)>);

        impl Reporter for DownloadEvents {
            fn info(&self, _message: &str) {}
            fn ok(&self, _message: &str) {}
            fn warn(&self, _message: &str) {}
            fn progress_started(&self, _total_seconds: f64) {}
            fn progress_percent(&self, _percent: i32) {}
            fn progress_finished(&self) {}

            fn download_started(&self, total_bytes: Option<u64>) {
                self.0.lock().expect("events lock").0 = Some(total_bytes);
            }

            fn download_progress(&self, bytes: u64) {
                self.0.lock().expect("events lock").1 += bytes;
            }

            fn download_finished(&self) {
                self.0.lock().expect("events lock").2 += 1;
            }
        }

        #[test]
        fn download_reports_byte_progress() -> anyhow::Result<()> {
            let dir = tempfile::tempdir()?;
            let dest_path = dir.path().join("ggml-base.bin");
            let bytes = vec![7u8; 200 * 1024];

            let events = DownloadEvents::default();
            download_to_path_with_reader(
                std::io::Cursor::new(bytes.clone()),
                Some(bytes.len() as u64),
                &dest_path,
                &events,
            )?;

            let (started, received, finished) = *events.0.lock().expect("events lock");
            assert_eq!(started, Some(Some(bytes.len() as u64)));
            assert_eq!(received, bytes.len() as u64);
            assert_eq!(finished, 1);
            Ok(())
        }

        #[test]
        fn download_writes_and_renames() -> anyhow::Result<()> {
            let dir = tempfile::tempdir()?;
            let dest_path = dir.path().join("ggml-tiny.bin");
            let tmp_path = PathBuf::from(format!("{}.part", dest_path.display()));

            let bytes = b"ggml model bytes".to_vec();
            download_to_path_with_reader(
                std::io::Cursor::new(bytes.clone()),
                Some(bytes.len() as u64),
                &dest_path,
                &TracingReporter,
            )?;

            assert!(!tmp_path.exists());
            assert_eq!(std::fs::read(&dest_path)?, bytes);
            Ok(())
        }

        struct FailingReader;

        impl Read for FailingReader {
            fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("connection reset"))
            }
        }

        #[test]
        fn download_cleans_up_part_file_on_error() -> anyhow::Result<()> {
            let dir = tempfile::tempdir()?;
            let dest_path = dir.path().join("ggml-tiny.bin");
            let tmp_path = PathBuf::from(format!("{}.part", dest_path.display()));

            let events = DownloadEvents::default();
            let err =
                download_to_path_with_reader(FailingReader, None, &dest_path, &events).unwrap_err();
            assert!(format!("{err:#}").contains("connection reset"));
            assert!(!dest_path.exists());
            assert!(!tmp_path.exists());

            let (started, received, finished) = *events.0.lock().expect("events lock");
            assert_eq!(started, Some(None));
            assert_eq!(received, 0);
            assert_eq!(finished, 1);
            Ok(())
        }
    }
}

#[cfg(not(feature = "download"))]
mod download {
    use std::path::Path;

    use anyhow::{Result, bail};

    use crate::report::Reporter;

    pub(super) fn download_model(url: &str, dest_path: &Path, _reporter: &dyn Reporter) -> Result<()> {
        bail!(
            "model not found at {} and this build cannot download it; fetch {url} manually",
            dest_path.display()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::TracingReporter;

    #[test]
    fn resolves_models_already_on_disk() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let store = ModelStore::new(dir.path());
        std::fs::write(store.model_path(ModelSize::Tiny), b"weights")?;

        let path = store.resolve(ModelSize::Tiny, false, &TracingReporter)?;
        assert_eq!(path, dir.path().join("ggml-tiny.bin"));
        Ok(())
    }

    #[test]
    fn missing_model_without_download_errors() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let store = ModelStore::new(dir.path());

        let err = store
            .resolve(ModelSize::Medium, false, &TracingReporter)
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("model 'medium' not found"));
        assert!(msg.contains("ggml-medium.bin"));
        Ok(())
    }

    #[test]
    fn model_urls_point_at_ggml_files() {
        assert_eq!(
            ModelStore::model_url(ModelSize::Large),
            "https://huggingface.co/ggerganov/whisper.cpp/resolve/main/ggml-large-v3.bin"
        );
    }
}
