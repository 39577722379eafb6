//! Throttled progress reporting for watched downloads.

use std::time::{Duration, Instant};

/// Rate-limits progress emissions to at most one per interval.
///
/// Directory events can arrive far faster than a human wants log lines, so
/// intermediate reports are suppressed until the interval has elapsed since
/// the last emission. The completion transition is exempt: `finish` always
/// emits exactly once.
#[derive(Debug)]
pub struct ProgressReporter {
    min_interval: Duration,
    last_emit: Instant,
}

impl ProgressReporter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_emit: Instant::now(),
        }
    }

    /// Reports intermediate progress. Returns whether a line was emitted.
    pub fn report(&mut self, current: u64, expected: Option<u64>) -> bool {
        let now = Instant::now();
        if now.duration_since(self.last_emit) < self.min_interval {
            return false;
        }
        self.last_emit = now;
        tracing::info!(
            "downloaded {} block bytes ({})",
            current,
            format_percent(current, expected)
        );
        true
    }

    /// Final report on completion; never suppressed.
    pub fn finish(&mut self, current: u64, expected: Option<u64>) {
        self.last_emit = Instant::now();
        tracing::info!(
            "download complete: {} bytes ({})",
            current,
            format_percent(current, expected)
        );
    }
}

/// "42.0%" when the total is known, "unknown" otherwise.
pub fn format_percent(count: u64, total: Option<u64>) -> String {
    match total {
        Some(total) if total > 0 => {
            format!("{:.1}%", (count as f64 / total as f64 * 100.0).min(100.0))
        }
        _ => "unknown".to_string(),
    }
}
