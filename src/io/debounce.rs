use std::time::{Duration, Instant};

/// Single-slot delayed write.
///
/// Scheduling replaces whatever is pending and restarts the quiet period, so
/// a burst of edits produces one write carrying the last value.
#[derive(Debug)]
pub struct Debouncer<T> {
    quiet: Duration,
    pending: Option<(Instant, T)>,
}

impl<T> Debouncer<T> {
    pub fn new(quiet: Duration) -> Self {
        Debouncer {
            quiet,
            pending: None,
        }
    }

    pub fn quiet(&self) -> Duration {
        self.quiet
    }

    /// Replace the pending value; it becomes due `quiet` after `at`.
    pub fn schedule(&mut self, value: T, at: Instant) {
        self.pending = Some((at + self.quiet, value));
    }

    /// When the pending value becomes due, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(deadline, _)| *deadline)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Release the pending value if its quiet period has elapsed by `at`.
    pub fn poll(&mut self, at: Instant) -> Option<T> {
        match &self.pending {
            Some((deadline, _)) if at >= *deadline => self.pending.take().map(|(_, v)| v),
            _ => None,
        }
    }

    /// Release the pending value now, regardless of the deadline.
    pub fn take(&mut self) -> Option<T> {
        self.pending.take().map(|(_, v)| v)
    }

    /// Drop the pending value without releasing it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

/// How long an event loop may block before the nearest deadline is due.
pub fn poll_timeout(deadlines: &[Option<Instant>], now: Instant, max: Duration) -> Duration {
    deadlines
        .iter()
        .flatten()
        .map(|d| d.saturating_duration_since(now))
        .fold(max, Duration::min)
}
