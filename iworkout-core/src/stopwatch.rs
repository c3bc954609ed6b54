//! Timer-based workout entry.

use chrono::{DateTime, Duration, Utc};

/// Accumulates workout time across start/stop cycles.
///
/// Finishing turns the elapsed time into a `(start, end)` pair that ends at
/// the moment of finishing.
#[derive(Debug, Clone, Default)]
pub struct Stopwatch {
    accumulated: Duration,
    running_since: Option<DateTime<Utc>>,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running_since.is_some()
    }

    pub fn start(&mut self, now: DateTime<Utc>) {
        if self.running_since.is_none() {
            self.running_since = Some(now);
        }
    }

    pub fn stop(&mut self, now: DateTime<Utc>) {
        if let Some(since) = self.running_since.take() {
            self.accumulated += now - since;
        }
    }

    pub fn reset(&mut self) {
        self.accumulated = Duration::zero();
        self.running_since = None;
    }

    /// Total time on the clock at `now`.
    pub fn elapsed(&self, now: DateTime<Utc>) -> Duration {
        match self.running_since {
            Some(since) => self.accumulated + (now - since),
            None => self.accumulated,
        }
    }

    /// Stops the clock and returns the workout bounds ending at `now`.
    ///
    /// `None` if no time was recorded.
    pub fn finish(&mut self, now: DateTime<Utc>) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        self.stop(now);
        if self.accumulated <= Duration::zero() {
            return None;
        }
        Some((now - self.accumulated, now))
    }
}

/// Formats a duration as `HH:MM:SS`.
pub fn format_clock(duration: Duration) -> String {
    let total = duration.num_seconds().max(0);
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total / 60) % 60,
        total % 60
    )
}
