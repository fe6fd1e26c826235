//! Error handling module for tvnorm

use thiserror::Error;

/// Main error type for tvnorm operations
#[derive(Error, Debug)]
pub enum NormError {
    /// The prober could not produce a usable result (unsupported mimetype,
    /// ffprobe missing or failed). The file stays undecided; the host will
    /// re-test it later.
    #[error("file could not be probed: {reason}")]
    ProbeUnavailable { reason: String },

    /// Probe result is missing data the policy depends on (no streams, no
    /// video stream). Policy fails closed on these instead of indexing past
    /// the end of the stream list.
    #[error("malformed probe result: {reason}")]
    MalformedProbe { reason: String },

    /// ffprobe emitted JSON we could not deserialize
    #[error("failed to parse prober output: {0}")]
    ProbeParse(#[from] serde_json::Error),

    /// Invalid configuration value
    #[error("invalid configuration: {message}")]
    Config { message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl NormError {
    pub fn probe_unavailable(reason: impl Into<String>) -> Self {
        Self::ProbeUnavailable {
            reason: reason.into(),
        }
    }

    pub fn malformed_probe(reason: impl Into<String>) -> Self {
        Self::MalformedProbe {
            reason: reason.into(),
        }
    }
}

/// Result type alias for tvnorm operations
pub type NormResult<T> = std::result::Result<T, NormError>;
