//! Unified error type for lamekit.
//!
//! Every stage of an invocation funnels its failures into [`Error`], which
//! carries enough context for callers to branch on the failure class via
//! [`Error::kind`].

use std::path::PathBuf;

/// Coarse failure class of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The input or output descriptor was rejected before any side effect.
    Validation,
    /// The bundled encoder could not be copied or made executable.
    Staging,
    /// The encoder process could not be launched or did not finish in time.
    Execution,
    /// The encoder ran but left no usable output file.
    EmptyOutput,
    /// A filesystem operation outside staging failed.
    Io,
}

/// Unified error type covering all failure modes of an invocation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input or output descriptor failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The bundled encoder could not be staged.
    #[error("Staging error [{}]: {message}", path.display())]
    Staging {
        /// Target (or source) path involved in the failed staging step.
        path: PathBuf,
        /// Human-readable error description, including captured diagnostics.
        message: String,
    },

    /// Execute permission could not be granted on the staged encoder.
    #[error("Permission error [{}]: {message}", path.display())]
    Permission {
        /// The staged executable.
        path: PathBuf,
        /// Human-readable error description.
        message: String,
    },

    /// The encoder process could not be spawned, waited on, or timed out.
    #[error("Execution error [{tool}]: {message}")]
    Execution {
        /// Name of the program that failed.
        tool: String,
        /// Human-readable error description.
        message: String,
    },

    /// The process finished but the output file is missing or empty.
    #[error(
        "output file {} was empty or missing; check stdout and stderr for details",
        path.display()
    )]
    EmptyOutput {
        /// The resolved output path that was probed.
        path: PathBuf,
    },

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}

impl Error {
    /// Classify this error into one of the coarse [`ErrorKind`]s.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) => ErrorKind::Validation,
            Error::Staging { .. } | Error::Permission { .. } => ErrorKind::Staging,
            Error::Execution { .. } => ErrorKind::Execution,
            Error::EmptyOutput { .. } => ErrorKind::EmptyOutput,
            Error::Io { .. } => ErrorKind::Io,
        }
    }

    /// Convenience constructor for [`Error::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    /// Convenience constructor for [`Error::Staging`].
    pub fn staging(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::Staging {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::Permission`].
    pub fn permission(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::Permission {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::Execution`].
    pub fn execution(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Execution {
            tool: tool.into(),
            message: message.into(),
        }
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
