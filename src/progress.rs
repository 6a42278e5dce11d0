//! Attempt counting, throughput and ETA.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use serde::Serialize;

/// Read-only view of a job's progress.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProgressSnapshot {
    pub attempted: u64,
    pub total: u64,
    #[serde(rename = "elapsed_secs", serialize_with = "serialize_secs")]
    pub elapsed: Duration,
}

fn serialize_secs<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

impl ProgressSnapshot {
    /// Attempts per second since the job started; zero until both the
    /// elapsed time and the attempt count are positive.
    pub fn rate(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs <= 0.0 || self.attempted == 0 {
            return 0.0;
        }
        self.attempted as f64 / secs
    }

    /// Remaining time at the current rate. `None` means unknown.
    pub fn eta(&self) -> Option<Duration> {
        let rate = self.rate();
        if rate <= 0.0 {
            return None;
        }
        let remaining = self.total.saturating_sub(self.attempted) as f64;
        Duration::try_from_secs_f64(remaining / rate).ok()
    }

    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        self.attempted as f64 * 100.0 / self.total as f64
    }

    /// ETA rendered for humans, with `unknown` when no rate is available.
    pub fn format_eta(&self) -> String {
        match self.eta() {
            Some(eta) => format!("{:.1}s", eta.as_secs_f64()),
            None => "unknown".to_string(),
        }
    }
}

/// Thread-safe attempt counter shared by all workers of one job.
#[derive(Debug)]
pub struct ProgressTracker {
    attempted: AtomicU64,
    total: u64,
    started: Instant,
    emit_interval_ms: u64,
    last_emit_ms: AtomicU64,
}

impl ProgressTracker {
    pub fn new(total: u64, emit_interval: Duration) -> Self {
        Self {
            attempted: AtomicU64::new(0),
            total,
            started: Instant::now(),
            emit_interval_ms: emit_interval.as_millis() as u64,
            last_emit_ms: AtomicU64::new(0),
        }
    }

    /// Add `delta` attempts and return the new count.
    pub fn record(&self, delta: u64) -> u64 {
        self.attempted.fetch_add(delta, Ordering::Relaxed) + delta
    }

    pub fn attempted(&self) -> u64 {
        self.attempted.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            attempted: self.attempted(),
            total: self.total,
            elapsed: self.started.elapsed(),
        }
    }

    /// Snapshot for display, at most once per emit interval across all
    /// callers. Only the caller that wins the interval gets `Some`.
    pub fn poll_emit(&self) -> Option<ProgressSnapshot> {
        let now = self.started.elapsed().as_millis() as u64;
        let last = self.last_emit_ms.load(Ordering::Relaxed);
        if now.saturating_sub(last) < self.emit_interval_ms {
            return None;
        }
        self.last_emit_ms
            .compare_exchange(last, now, Ordering::AcqRel, Ordering::Relaxed)
            .ok()
            .map(|_| self.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(attempted: u64, total: u64, secs: f64) -> ProgressSnapshot {
        ProgressSnapshot {
            attempted,
            total,
            elapsed: Duration::from_secs_f64(secs),
        }
    }

    #[test]
    fn rate_is_zero_without_time_or_attempts() {
        assert_eq!(snap(0, 10, 5.0).rate(), 0.0);
        assert_eq!(snap(5, 10, 0.0).rate(), 0.0);
        assert_eq!(snap(5, 10, 0.0).eta(), None);
        assert_eq!(snap(5, 10, 0.0).format_eta(), "unknown");
    }

    #[test]
    fn eta_from_rate() {
        let s = snap(50, 150, 5.0);
        assert!((s.rate() - 10.0).abs() < 1e-9);
        let eta = s.eta().unwrap().as_secs_f64();
        assert!((eta - 10.0).abs() < 1e-6);
    }

    #[test]
    fn record_accumulates() {
        let tracker = ProgressTracker::new(10, Duration::from_millis(0));
        assert_eq!(tracker.record(1), 1);
        assert_eq!(tracker.record(3), 4);
        assert_eq!(tracker.snapshot().attempted, 4);
        assert_eq!(tracker.snapshot().total, 10);
    }

    #[test]
    fn poll_emit_respects_interval() {
        let tracker = ProgressTracker::new(10, Duration::from_secs(3600));
        assert!(tracker.poll_emit().is_none());
    }
}
