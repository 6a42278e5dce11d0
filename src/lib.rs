//! Concurrent digest recovery.
//!
//! Given a target digest, an algorithm and a finite candidate source, the
//! [`Scheduler`] partitions the candidates across a fixed pool of worker
//! threads and reports the first plaintext that reproduces the digest.
//! Runs can be cancelled, time out, and back off while the machine is
//! busy.

pub mod brute_force;
pub mod cancel;
pub mod candidate;
pub mod config;
pub mod dictionary;
mod error;
pub mod hash_spec;
pub mod io_utils;
pub mod progress;
pub mod report;
pub mod scheduler;
pub mod shared;
pub mod throttle;
pub mod verifier;

pub use brute_force::BruteForce;
pub use cancel::{install_interrupt_handler, CancellationToken};
pub use candidate::{partition_bounds, CandidateSource, Partition};
pub use config::{Config, ThrottleConfig};
pub use dictionary::Dictionary;
pub use error::{CrackError, CrackResult};
pub use hash_spec::{identify, validate_digest, Algorithm, HashSpec};
pub use progress::{ProgressSnapshot, ProgressTracker};
pub use report::{JobFinished, JobObserver, JobStarted, NoopObserver, ProgressBarObserver};
pub use scheduler::{CrackJob, CrackOutcome, CrackReport, Scheduler};
pub use shared::{CancelReason, SharedResult};
pub use throttle::{
    LoadSampler, LoadThrottle, NoThrottle, SysinfoSampler, SystemLoadThrottle, ThrottleState,
};
pub use verifier::{DigestRegistry, Scheme, Verifier};
