//! Job lifecycle events and the sinks that consume them.

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use crate::progress::ProgressSnapshot;

/// Emitted once, before any worker starts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobStarted {
    pub target: String,
    pub algorithm: String,
    pub source: String,
    pub total: u64,
    pub workers: usize,
}

/// Emitted once, after every worker has been joined.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobFinished {
    /// `found`, `not_found`, `interrupted` or `timed_out`.
    pub outcome: String,
    pub plaintext: Option<String>,
    pub attempted: u64,
    pub total: u64,
    pub elapsed_secs: f64,
}

/// Receives job events. Calls may come from any worker thread.
pub trait JobObserver: Send + Sync {
    fn on_start(&self, _event: &JobStarted) {}
    fn on_progress(&self, _snapshot: &ProgressSnapshot) {}
    fn on_finish(&self, _event: &JobFinished) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl JobObserver for NoopObserver {}

/// Terminal progress bar on stderr.
pub struct ProgressBarObserver {
    bar: ProgressBar,
}

impl ProgressBarObserver {
    pub fn new() -> Self {
        let bar = ProgressBar::hidden();
        let style = ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] \
                 {pos}/{len} ({percent}%) {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        bar.set_style(style);
        Self { bar }
    }
}

impl Default for ProgressBarObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl JobObserver for ProgressBarObserver {
    fn on_start(&self, event: &JobStarted) {
        self.bar.set_draw_target(indicatif::ProgressDrawTarget::stderr());
        self.bar.set_length(event.total);
        self.bar.set_position(0);
        self.bar.set_message(format!("{} ({})", event.algorithm, event.source));
    }

    fn on_progress(&self, snapshot: &ProgressSnapshot) {
        self.bar.set_position(snapshot.attempted);
        self.bar
            .set_message(format!("{:.0}/s, eta {}", snapshot.rate(), snapshot.format_eta()));
    }

    fn on_finish(&self, event: &JobFinished) {
        self.bar.set_position(event.attempted);
        self.bar.finish_with_message(event.outcome.clone());
    }
}
