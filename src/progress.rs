/// Transcription progress, measured in seconds of media.
///
/// The total comes from duration probing and is `0.0` when unknown. whisper.cpp reports progress
/// as a percentage, which is mapped onto the total here. `elapsed` never exceeds `total` when the
/// total is known, and never moves backwards.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProgressState {
    elapsed: f64,
    total: f64,
    percent: u8,
}

impl ProgressState {
    /// Start tracking against `total_seconds`. Non-positive or non-finite totals mean "unknown".
    pub fn new(total_seconds: f64) -> Self {
        let total = if total_seconds.is_finite() && total_seconds > 0.0 {
            total_seconds
        } else {
            0.0
        };

        Self {
            elapsed: 0.0,
            total,
            percent: 0,
        }
    }

    pub fn is_known(&self) -> bool {
        self.total > 0.0
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn percent(&self) -> u8 {
        self.percent
    }

    /// Record a progress report. Values above 100 are clamped; stale reports are ignored.
    pub fn update_percent(&mut self, percent: i32) {
        let percent = percent.clamp(0, 100) as u8;
        if percent <= self.percent {
            return;
        }

        self.percent = percent;
        self.elapsed = (self.total * f64::from(percent) / 100.0).min(self.total);
    }

    /// Mark the run finished, whatever the last report said.
    pub fn complete(&mut self) {
        self.percent = 100;
        self.elapsed = self.total;
    }
}
