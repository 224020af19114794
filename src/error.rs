//! Error types for pipeline construction and consumption.
//!
//! Every error is raised lazily: a `RecordSequence` yields `Err` items at
//! the pull where the problem occurs, never when a stage or pipeline is
//! merely built. Once a sequence has yielded an error it is exhausted and
//! must not be pulled further.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while producing, transforming, or draining records.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The source path does not exist.
    #[error("source not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The underlying stream could not be parsed into records.
    #[error("invalid source: {0}")]
    InvalidSource(String),

    /// A record's shape does not match what the stage requires: wrong
    /// variant (positional vs. associative) or a row length inconsistent
    /// with the captured header.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// A sink write failed; the remaining sequence is abandoned.
    #[error("write failed: {0}")]
    WriteError(String),

    /// The write destination exists and overwriting was not permitted.
    #[error("destination already exists: {}", path.display())]
    AlreadyExists { path: PathBuf },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = PipelineError::NotFound {
            path: PathBuf::from("/tmp/missing.csv"),
        };
        assert_eq!(err.to_string(), "source not found: /tmp/missing.csv");

        let err = PipelineError::ShapeMismatch("record has 2 fields, header has 3".to_string());
        assert_eq!(
            err.to_string(),
            "shape mismatch: record has 2 fields, header has 3"
        );
    }
}
