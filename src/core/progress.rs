use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Number of non-discarded outcomes in the current run.
///
/// Relaxed ordering throughout: the value only feeds progress output.
#[derive(Debug, Clone, Default)]
pub struct CompletionCounter {
    count: Arc<AtomicUsize>,
}

impl CompletionCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the count including this increment.
    pub fn increment(&self) -> usize {
        self.count.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn get(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone)]
pub struct ProgressReporter {
    interval: usize,
    enabled: bool,
    started: Instant,
}

impl ProgressReporter {
    pub fn new(interval: usize, enabled: bool) -> Self {
        Self {
            interval,
            enabled,
            started: Instant::now(),
        }
    }

    pub fn disabled() -> Self {
        Self::new(0, false)
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn timestamp(&self) -> String {
        format_hms(self.elapsed())
    }

    pub fn should_report(&self, completed: usize) -> bool {
        self.enabled && self.interval > 0 && completed > 0 && completed % self.interval == 0
    }

    pub fn observe(&self, completed: usize) {
        if self.should_report(completed) {
            tracing::info!("{}     {} requests completed.", self.timestamp(), completed);
        }
    }
}

pub fn format_hms(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}
