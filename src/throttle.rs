//! Voluntary pauses when the machine is busy.
//!
//! Workers ask [`LoadThrottle::should_pause`] after every candidate. The
//! system throttle answers from a cached load sample and refreshes that
//! sample at most once per sampling interval; a worker that finds another
//! worker mid-sample reads the cached value instead of waiting.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use sysinfo::{CpuExt, System, SystemExt};
use tracing::{debug, warn};

use crate::config::ThrottleConfig;

/// Source of throttle decisions, injectable so tests can disable or fake it.
pub trait LoadThrottle: Send + Sync {
    /// Whether the calling worker should pause before its next candidate.
    fn should_pause(&self) -> bool;

    /// How long one pause lasts.
    fn pause_duration(&self) -> Duration;

    /// Forget previous samples; called at the start of every job.
    fn reset(&self) {}
}

/// Never pauses.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoThrottle;

impl LoadThrottle for NoThrottle {
    fn should_pause(&self) -> bool {
        false
    }

    fn pause_duration(&self) -> Duration {
        Duration::ZERO
    }
}

/// Last load sample, as seen by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThrottleState {
    /// Time of the last sample, measured from throttle creation.
    pub last_sample: Option<Duration>,
    pub last_load_percent: f32,
}

/// Reads the current global CPU usage in percent.
pub trait LoadSampler: Send {
    /// `None` when the platform cannot report load.
    fn sample(&mut self) -> Option<f32>;
}

/// [`LoadSampler`] backed by `sysinfo`.
pub struct SysinfoSampler {
    system: System,
}

impl SysinfoSampler {
    pub fn new() -> Self {
        let mut system = System::new();
        if System::IS_SUPPORTED {
            system.refresh_cpu();
        }
        Self { system }
    }
}

impl Default for SysinfoSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadSampler for SysinfoSampler {
    fn sample(&mut self) -> Option<f32> {
        if !System::IS_SUPPORTED {
            return None;
        }
        self.system.refresh_cpu();
        Some(self.system.global_cpu_info().cpu_usage())
    }
}

/// Throttle driven by global CPU usage.
pub struct SystemLoadThrottle {
    config: ThrottleConfig,
    sampler: Mutex<Box<dyn LoadSampler>>,
    origin: Instant,
    sampled: AtomicBool,
    last_sample_ms: AtomicU64,
    last_load_bits: AtomicU32,
    degraded: AtomicBool,
}

impl SystemLoadThrottle {
    pub fn new(config: ThrottleConfig) -> Self {
        Self::with_sampler(config, Box::new(SysinfoSampler::new()))
    }

    pub fn with_sampler(config: ThrottleConfig, sampler: Box<dyn LoadSampler>) -> Self {
        Self {
            config,
            sampler: Mutex::new(sampler),
            origin: Instant::now(),
            sampled: AtomicBool::new(false),
            last_sample_ms: AtomicU64::new(0),
            last_load_bits: AtomicU32::new(0f32.to_bits()),
            degraded: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> ThrottleState {
        let last_sample = self
            .sampled
            .load(Ordering::Acquire)
            .then(|| Duration::from_millis(self.last_sample_ms.load(Ordering::Relaxed)));
        ThrottleState {
            last_sample,
            last_load_percent: f32::from_bits(self.last_load_bits.load(Ordering::Relaxed)),
        }
    }

    /// Set once sampling has failed; a degraded throttle never pauses.
    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::Relaxed)
    }

    fn sample_due(&self, now_ms: u64) -> bool {
        !self.sampled.load(Ordering::Acquire)
            || now_ms.saturating_sub(self.last_sample_ms.load(Ordering::Relaxed))
                >= self.config.sample_interval_ms
    }

    fn degrade(&self, why: &str) {
        if !self.degraded.swap(true, Ordering::AcqRel) {
            warn!("cannot sample system load ({why}); throttling disabled");
        }
    }

    fn sample(&self, now_ms: u64) {
        let Ok(mut sampler) = self.sampler.try_lock() else {
            return;
        };
        if !self.sample_due(now_ms) {
            return;
        }
        let load = match sampler.sample() {
            Some(load) if load.is_finite() => load,
            Some(_) => return self.degrade("non-finite cpu usage"),
            None => return self.degrade("platform not supported"),
        };
        self.last_load_bits.store(load.to_bits(), Ordering::Relaxed);
        self.last_sample_ms.store(now_ms, Ordering::Relaxed);
        self.sampled.store(true, Ordering::Release);
        debug!(load_percent = load, "sampled system load");
    }
}

impl LoadThrottle for SystemLoadThrottle {
    fn should_pause(&self) -> bool {
        if !self.config.enabled || self.is_degraded() {
            return false;
        }
        let now_ms = self.origin.elapsed().as_millis() as u64;
        if self.sample_due(now_ms) {
            self.sample(now_ms);
        }
        !self.is_degraded()
            && f32::from_bits(self.last_load_bits.load(Ordering::Relaxed))
                > self.config.threshold_percent
    }

    fn pause_duration(&self) -> Duration {
        self.config.pause()
    }

    fn reset(&self) {
        self.sampled.store(false, Ordering::Release);
        self.last_load_bits.store(0f32.to_bits(), Ordering::Relaxed);
    }
}
