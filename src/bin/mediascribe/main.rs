// Command-line entry point: transcribe one media file to `<name>.<timestamp>.txt` and `.srt`.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::error;

use mediascribe::{Error, Reporter, Runner};

mod args;
mod console;

use args::Params;
use console::ConsoleReporter;

fn main() -> ExitCode {
    mediascribe::init_logging();

    let config = Params::parse().into_config();
    let reporter: Arc<dyn Reporter> = Arc::new(ConsoleReporter::new());
    let runner = Runner::whisper(reporter);

    match runner.run(&config) {
        Ok(_) => ExitCode::SUCCESS,
        Err(Error::InputNotFound { path }) => {
            eprintln!("[ERR] File not found: {}", path.display());
            ExitCode::from(1)
        }
        Err(err) => {
            error!(error = %err, input = %config.input.display(), "transcription failed");
            eprintln!("[ERR] {err}");
            ExitCode::FAILURE
        }
    }
}
