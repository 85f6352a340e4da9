//! Error types for building and running the task graph.

use std::path::PathBuf;

use autodep_common::InternalError;
use autodep_config::ConfigError;

/// Errors raised while constructing or running a build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The project configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A file could not be read.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A target names a source file that does not exist.
    #[error("source file not found: {0}")]
    MissingSource(PathBuf),

    /// A shallow-scan pattern failed to compile.
    #[error("invalid shallow-scan pattern: {0}")]
    InvalidPattern(String),

    /// A task failed during execution.
    #[error("task {task} failed: {reason}")]
    TaskFailed {
        /// Display form of the failing task.
        task: String,
        /// Why it failed.
        reason: String,
    },

    /// A build-graph invariant was violated.
    #[error(transparent)]
    Internal(#[from] InternalError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_display() {
        let err = BuildError::Io {
            path: PathBuf::from("/src/main.cpp"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        let msg = err.to_string();
        assert!(msg.contains("I/O error"));
        assert!(msg.contains("main.cpp"));
    }

    #[test]
    fn missing_source_display() {
        let err = BuildError::MissingSource(PathBuf::from("/src/nope.cpp"));
        assert_eq!(err.to_string(), "source file not found: /src/nope.cpp");
    }

    #[test]
    fn internal_is_transparent() {
        let err: BuildError = InternalError::new("scheduler stalled").into();
        assert_eq!(err.to_string(), "internal build error: scheduler stalled");
    }
}
