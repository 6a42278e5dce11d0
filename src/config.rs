use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::CrackError;

/// Letters and digits, the default brute-force alphabet.
pub const DEFAULT_CHARSET: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
pub const DEFAULT_WORKERS: usize = 4;
pub const MAX_WORKERS: usize = 1000;
/// Upper bound for one throttle pause and for the load sampling interval.
pub const MAX_PAUSE_MS: u64 = 60_000;
/// Upper bound for the job timeout, one year.
pub const MAX_TIMEOUT_SECS: u64 = 365 * 24 * 60 * 60;

/// Runtime configuration for a cracking run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of worker threads, one per partition.
    pub workers: usize,
    /// Alphabet used by brute-force mode.
    pub charset: String,
    /// Minimum spacing between progress emissions.
    pub progress_interval_ms: u64,
    /// Cancel the job after this many seconds.
    pub timeout_secs: Option<u64>,
    pub throttle: ThrottleConfig,
}

/// Load-adaptive pausing parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrottleConfig {
    pub enabled: bool,
    /// System-wide CPU usage above which workers pause.
    pub threshold_percent: f32,
    /// Length of one pause.
    pub pause_ms: u64,
    /// Minimum spacing between load samples.
    pub sample_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            charset: DEFAULT_CHARSET.to_string(),
            progress_interval_ms: 100,
            timeout_secs: None,
            throttle: ThrottleConfig::default(),
        }
    }
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold_percent: 90.0,
            pause_ms: 500,
            sample_interval_ms: 250,
        }
    }
}

impl Config {
    /// Parse and validate a JSON configuration. Missing fields take their
    /// defaults.
    pub fn from_json(json: &str) -> Result<Self, CrackError> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CrackError> {
        if self.workers == 0 || self.workers > MAX_WORKERS {
            return Err(CrackError::Config(format!(
                "workers must be between 1 and {MAX_WORKERS}, got {}",
                self.workers
            )));
        }
        if self.charset.is_empty() {
            return Err(CrackError::Config("charset must not be empty".into()));
        }
        if let Some(secs) = self.timeout_secs {
            if secs == 0 || secs > MAX_TIMEOUT_SECS {
                return Err(CrackError::Config(format!(
                    "timeout must be between 1 and {MAX_TIMEOUT_SECS} seconds, got {secs}"
                )));
            }
        }
        self.throttle.validate()
    }

    pub fn progress_interval(&self) -> Duration {
        Duration::from_millis(self.progress_interval_ms)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl ThrottleConfig {
    pub fn validate(&self) -> Result<(), CrackError> {
        if !(self.threshold_percent > 0.0 && self.threshold_percent <= 100.0) {
            return Err(CrackError::Config(format!(
                "throttle threshold must be in (0, 100], got {}",
                self.threshold_percent
            )));
        }
        if self.pause_ms > MAX_PAUSE_MS {
            return Err(CrackError::Config(format!(
                "throttle pause must be at most {MAX_PAUSE_MS} ms, got {}",
                self.pause_ms
            )));
        }
        if self.sample_interval_ms > MAX_PAUSE_MS {
            return Err(CrackError::Config(format!(
                "throttle sample interval must be at most {MAX_PAUSE_MS} ms, got {}",
                self.sample_interval_ms
            )));
        }
        Ok(())
    }

    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.pause_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config =
            Config::from_json(r#"{ "workers": 8, "throttle": { "pause_ms": 10 } }"#).unwrap();
        assert_eq!(config.workers, 8);
        assert_eq!(config.charset, DEFAULT_CHARSET);
        assert_eq!(config.throttle.pause_ms, 10);
        assert!(config.throttle.enabled);
    }

    #[test]
    fn zero_workers_rejected() {
        let err = Config::from_json(r#"{ "workers": 0 }"#).unwrap_err();
        assert!(matches!(err, CrackError::Config(_)));
    }

    #[test]
    fn unbounded_durations_rejected() {
        for json in [
            r#"{ "timeout_secs": 18446744073709551615 }"#,
            r#"{ "timeout_secs": 0 }"#,
            r#"{ "throttle": { "pause_ms": 18446744073709551615 } }"#,
            r#"{ "throttle": { "sample_interval_ms": 60001 } }"#,
        ] {
            let err = Config::from_json(json).unwrap_err();
            assert!(matches!(err, CrackError::Config(_)), "{json}");
        }
        let ok = Config::from_json(r#"{ "timeout_secs": 30, "throttle": { "pause_ms": 60000 } }"#);
        assert!(ok.is_ok());
    }

    #[test]
    fn bad_threshold_rejected() {
        let err =
            Config::from_json(r#"{ "throttle": { "threshold_percent": 150.0 } }"#).unwrap_err();
        assert!(matches!(err, CrackError::Config(_)));
    }
}
