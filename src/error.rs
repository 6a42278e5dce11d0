use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrackError {
    /// Invalid runtime or job configuration (worker count, length, alphabet).
    #[error("config error: {0}")]
    Config(String),

    /// Algorithm identifier that is not in the registry.
    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    /// Target digest does not have the shape its algorithm produces.
    #[error("digest does not look like {algorithm}: {reason}")]
    DigestShape { algorithm: String, reason: String },

    /// Candidate space cannot be counted in 64 bits.
    #[error("search space too large: {0}")]
    SearchSpaceTooLarge(String),

    /// Every wordlist was empty, missing or unreadable.
    #[error("no candidates to try")]
    NoCandidates,

    /// Interrupt handler could not be installed.
    #[error("interrupt handler error: {0}")]
    Interrupt(String),

    /// Worker threads could not be started.
    #[error("worker pool error: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    /// Propagated I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON configuration.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type CrackResult<T> = Result<T, CrackError>;
