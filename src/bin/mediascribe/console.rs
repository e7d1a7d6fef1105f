use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use mediascribe::{ProgressState, Reporter};

const BAR_TEMPLATE: &str = "Transcribing {bar:40.cyan/blue} {pos}/{len}s [{elapsed_precise}<{eta_precise}]";
const SPINNER_TEMPLATE: &str = "{spinner:.green} Transcribing {msg} [{elapsed_precise}]";
const DOWNLOAD_TEMPLATE: &str = "{spinner:.green} {bytes}/{total_bytes} {bar:40.cyan/blue} {eta}";

/// Prints `[INFO]`/`[OK]`/`[WARN]` milestone lines and drives an indicatif progress bar.
///
/// With a known duration the bar counts seconds of media; otherwise a spinner shows whisper's
/// percentage. Model downloads get their own byte bar.
#[derive(Default)]
pub struct ConsoleReporter {
    active: Mutex<Option<ActiveBar>>,
    download: Mutex<Option<ProgressBar>>,
}

struct ActiveBar {
    bar: ProgressBar,
    state: ProgressState,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_active(&self, f: impl FnOnce(&mut Option<ActiveBar>)) {
        f(&mut lock(&self.active));
    }

    fn with_download(&self, f: impl FnOnce(&mut Option<ProgressBar>)) {
        f(&mut lock(&self.download));
    }

    fn print_line(&self, line: String) {
        self.with_active(|active| match active {
            Some(active) => active.bar.println(line),
            None => println!("{line}"),
        });
    }
}

impl Reporter for ConsoleReporter {
    fn info(&self, message: &str) {
        self.print_line(format!("[INFO] {message}"));
    }

    fn ok(&self, message: &str) {
        self.print_line(format!("[OK] {message}"));
    }

    fn warn(&self, message: &str) {
        self.print_line(format!("[WARN] {message}"));
    }

    fn progress_started(&self, total_seconds: f64) {
        let state = ProgressState::new(total_seconds);
        let bar = if state.is_known() {
            let bar = ProgressBar::new(state.total().ceil() as u64);
            if let Ok(style) = ProgressStyle::with_template(BAR_TEMPLATE) {
                bar.set_style(style.progress_chars("#>-"));
            }
            bar
        } else {
            let bar = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::with_template(SPINNER_TEMPLATE) {
                bar.set_style(style);
            }
            bar.set_message("0%");
            bar.enable_steady_tick(Duration::from_millis(120));
            bar
        };

        self.with_active(|active| *active = Some(ActiveBar { bar, state }));
    }

    fn progress_percent(&self, percent: i32) {
        self.with_active(|active| {
            let Some(active) = active else {
                return;
            };

            active.state.update_percent(percent);
            if active.state.is_known() {
                active.bar.set_position(active.state.elapsed().floor() as u64);
            } else {
                active.bar.set_message(format!("{}%", active.state.percent()));
            }
        });
    }

    fn progress_finished(&self) {
        self.with_active(|active| {
            let Some(mut finished) = active.take() else {
                return;
            };

            finished.state.complete();
            if finished.state.is_known() {
                finished.bar.set_position(finished.state.total().ceil() as u64);
                finished.bar.finish();
            } else {
                finished.bar.finish_with_message("done");
            }
        });
    }

    fn download_started(&self, total_bytes: Option<u64>) {
        let bar = match total_bytes {
            Some(total) => ProgressBar::new(total),
            None => ProgressBar::new_spinner(),
        };
        if let Ok(style) = ProgressStyle::with_template(DOWNLOAD_TEMPLATE) {
            bar.set_style(style.progress_chars("#>-"));
        }

        self.with_download(|download| *download = Some(bar));
    }

    fn download_progress(&self, bytes: u64) {
        self.with_download(|download| {
            if let Some(bar) = download {
                bar.inc(bytes);
            }
        });
    }

    fn download_finished(&self) {
        self.with_download(|download| {
            if let Some(bar) = download.take() {
                bar.finish_and_clear();
            }
        });
    }
}

// A poisoned lock only means a previous progress update panicked; keep reporting.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
