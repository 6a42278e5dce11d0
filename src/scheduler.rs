//! Partitioned, cancellable search over a candidate source.
//!
//! [`Scheduler::run`] splits the job's source into one partition per worker
//! and runs each partition as a task on a rayon pool with exactly one thread
//! per worker. The pool scope joins every task before `run` returns.
//! Workers share three things: the winner gate in [`SharedResult`], the
//! attempt counter in [`ProgressTracker`], and the throttle.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::cancel::CancellationToken;
use crate::candidate::{CandidateSource, Partition};
use crate::config::{Config, MAX_PAUSE_MS, MAX_WORKERS};
use crate::hash_spec::{validate_digest, Algorithm};
use crate::progress::{ProgressSnapshot, ProgressTracker};
use crate::report::{JobFinished, JobObserver, JobStarted, NoopObserver};
use crate::shared::{CancelReason, SharedResult};
use crate::throttle::{LoadThrottle, NoThrottle, SystemLoadThrottle};
use crate::verifier::Verifier;
use crate::CrackError;

/// Longest single sleep while paused, so a stop is noticed promptly.
const PAUSE_SLICE: Duration = Duration::from_millis(25);
/// Pauses requested by a throttle are capped at this length.
const MAX_PAUSE: Duration = Duration::from_millis(MAX_PAUSE_MS);

/// A validated request to recover the plaintext of one digest.
#[derive(Debug, Clone)]
pub struct CrackJob {
    target: String,
    algorithm: Algorithm,
    source: CandidateSource,
    workers: usize,
}

impl CrackJob {
    /// Validate and build a job.
    ///
    /// Fixed-length hex targets are trimmed and lowercased. Fails when the
    /// worker count is out of range, the digest cannot come from
    /// `algorithm`, a slow algorithm is paired with brute force, or the
    /// source has nothing to try.
    pub fn new(
        target: impl Into<String>,
        algorithm: Algorithm,
        source: CandidateSource,
        workers: usize,
    ) -> Result<Self, CrackError> {
        if workers == 0 || workers > MAX_WORKERS {
            return Err(CrackError::Config(format!(
                "workers must be between 1 and {MAX_WORKERS}, got {workers}"
            )));
        }

        let mut target = target.into().trim().to_string();
        if !algorithm.is_self_describing() {
            target.make_ascii_lowercase();
        }
        validate_digest(algorithm, &target)?;

        if matches!(source, CandidateSource::BruteForce(_)) && !algorithm.supports_brute_force() {
            return Err(CrackError::Config(format!(
                "brute force is not supported for {algorithm}; use a wordlist"
            )));
        }
        if source.is_empty() {
            return Err(CrackError::NoCandidates);
        }

        Ok(Self {
            target,
            algorithm,
            source,
            workers,
        })
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn source(&self) -> &CandidateSource {
        &self.source
    }

    pub fn workers(&self) -> usize {
        self.workers
    }
}

/// How a job ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrackOutcome {
    Found(String),
    NotFound,
    Cancelled(CancelReason),
}

impl CrackOutcome {
    /// Stable label used in events and JSON output.
    pub fn label(&self) -> &'static str {
        match self {
            CrackOutcome::Found(_) => "found",
            CrackOutcome::NotFound => "not_found",
            CrackOutcome::Cancelled(CancelReason::Interrupted) => "interrupted",
            CrackOutcome::Cancelled(CancelReason::TimedOut) => "timed_out",
        }
    }

    pub fn plaintext(&self) -> Option<&str> {
        match self {
            CrackOutcome::Found(plain) => Some(plain),
            _ => None,
        }
    }
}

/// Result of [`Scheduler::run`].
#[derive(Debug, Clone, PartialEq)]
pub struct CrackReport {
    pub outcome: CrackOutcome,
    pub progress: ProgressSnapshot,
}

/// Runs [`CrackJob`]s on a fixed-size pool of worker threads.
#[derive(Clone)]
pub struct Scheduler {
    verifier: Arc<dyn Verifier>,
    throttle: Arc<dyn LoadThrottle>,
    observer: Arc<dyn JobObserver>,
    cancel: CancellationToken,
    timeout: Option<Duration>,
    progress_interval: Duration,
}

/// Per-run state borrowed by every worker.
struct RunContext<'a> {
    scheduler: &'a Scheduler,
    job: &'a CrackJob,
    shared: SharedResult,
    progress: ProgressTracker,
    deadline: Option<Instant>,
}

impl Scheduler {
    /// Scheduler with no throttle, no observer, no timeout and a fresh
    /// cancellation token.
    pub fn new(verifier: Arc<dyn Verifier>) -> Self {
        Self {
            verifier,
            throttle: Arc::new(NoThrottle),
            observer: Arc::new(NoopObserver),
            cancel: CancellationToken::new(),
            timeout: None,
            progress_interval: Duration::from_millis(100),
        }
    }

    /// Scheduler configured from `config`: system load throttle when
    /// enabled, timeout and progress interval.
    pub fn from_config(config: &Config, verifier: Arc<dyn Verifier>) -> Self {
        let throttle: Arc<dyn LoadThrottle> = if config.throttle.enabled {
            Arc::new(SystemLoadThrottle::new(config.throttle.clone()))
        } else {
            Arc::new(NoThrottle)
        };
        Self::new(verifier)
            .with_throttle(throttle)
            .with_timeout(config.timeout())
            .with_progress_interval(config.progress_interval())
    }

    pub fn with_throttle(mut self, throttle: Arc<dyn LoadThrottle>) -> Self {
        self.throttle = throttle;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn JobObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Use `token` for external cancellation, e.g. one wired to Ctrl-C.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = interval;
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Search `job` until a match, exhaustion or cancellation.
    ///
    /// Cancellation is reported as [`CrackOutcome::Cancelled`], not as an
    /// error. A match found while a cancellation races with it is still
    /// reported as found.
    pub fn run(&self, job: &CrackJob) -> Result<CrackReport, CrackError> {
        let total = job.source.size();
        self.throttle.reset();
        let ctx = RunContext {
            scheduler: self,
            job,
            shared: SharedResult::new(),
            progress: ProgressTracker::new(total, self.progress_interval),
            // A timeout too far out to represent is no deadline at all.
            deadline: self.timeout.and_then(|t| Instant::now().checked_add(t)),
        };

        self.observer.on_start(&JobStarted {
            target: job.target.clone(),
            algorithm: job.algorithm.to_string(),
            source: job.source.describe(),
            total,
            workers: job.workers,
        });
        info!(
            algorithm = %job.algorithm,
            workers = job.workers,
            total,
            "starting job"
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(job.workers)
            .thread_name(|index| format!("clats-worker-{index}"))
            .build()?;
        let partitions = job.source.partition(job.workers);
        let ctx = &ctx;
        pool.scope(|scope| {
            for (index, partition) in partitions.into_iter().enumerate() {
                scope.spawn(move |_| ctx.work(index, partition));
            }
        });

        let outcome = match (ctx.shared.found(), ctx.shared.cancelled()) {
            (Some(plain), _) => CrackOutcome::Found(plain),
            (None, Some(reason)) => CrackOutcome::Cancelled(reason),
            (None, None) => CrackOutcome::NotFound,
        };
        let progress = ctx.progress.snapshot();
        self.observer.on_progress(&progress);
        self.observer.on_finish(&JobFinished {
            outcome: outcome.label().to_string(),
            plaintext: outcome.plaintext().map(str::to_string),
            attempted: progress.attempted,
            total: progress.total,
            elapsed_secs: progress.elapsed.as_secs_f64(),
        });
        info!(
            outcome = outcome.label(),
            attempted = progress.attempted,
            elapsed_secs = progress.elapsed.as_secs_f64(),
            "job finished"
        );

        Ok(CrackReport { outcome, progress })
    }
}

impl RunContext<'_> {
    /// Returns `true` when the worker must stop, recording why.
    fn should_stop(&self) -> bool {
        if self.shared.is_stopped() {
            return true;
        }
        if self.scheduler.cancel.is_cancelled() {
            self.shared.cancel(CancelReason::Interrupted);
            return true;
        }
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            self.shared.cancel(CancelReason::TimedOut);
            return true;
        }
        false
    }

    fn pause(&self) {
        let pause = self.scheduler.throttle.pause_duration().min(MAX_PAUSE);
        let Some(until) = Instant::now().checked_add(pause) else {
            return;
        };
        loop {
            let now = Instant::now();
            if now >= until || self.should_stop() {
                return;
            }
            thread::sleep((until - now).min(PAUSE_SLICE));
        }
    }

    fn work(&self, index: usize, partition: Partition<'_>) {
        if partition.is_empty() {
            debug!(worker = index, "nothing to do");
            return;
        }
        debug!(worker = index, candidates = partition.len(), "worker started");
        let verifier = &self.scheduler.verifier;
        let (algorithm, target) = (self.job.algorithm, self.job.target.as_str());

        for candidate in partition.iter() {
            if self.should_stop() {
                break;
            }
            if verifier.verify(&candidate, algorithm, target) {
                if self.shared.try_claim(&candidate) {
                    debug!(worker = index, "claimed winning candidate");
                }
                break;
            }
            self.progress.record(1);
            if let Some(snapshot) = self.progress.poll_emit() {
                self.scheduler.observer.on_progress(&snapshot);
            }
            if self.scheduler.throttle.should_pause() {
                self.pause();
            }
        }
        debug!(worker = index, "worker stopped");
    }
}
