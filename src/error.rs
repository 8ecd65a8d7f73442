//! Error types for pipe path parsing and pipe I/O.

use thiserror::Error;

/// Result type alias for filesystem operations.
pub type FsResult<T> = Result<T, FsError>;

/// Errors reported by the pipe filesystem and the backend registry.
///
/// Every I/O variant names the offending path; variants wrapping a
/// [`std::io::Error`] carry the OS error code and message through it.
#[derive(Debug, Error)]
pub enum FsError {
    /// Path handed to the parser without a trailing pipe marker
    #[error("invalid pipe path {path:?}: must end with '|'")]
    MissingMarker { path: String },

    /// Non-numeric token inside an `{allowed_exit_codes=...}` annotation
    #[error("invalid allowed exit code {token:?} in {path:?}: expected a non-negative integer")]
    InvalidExitCode { path: String, token: String },

    /// Numeric token too large for a 32-bit exit code
    #[error("allowed exit code {token:?} in {path:?} is out of range")]
    ExitCodeOutOfRange { path: String, token: String },

    /// Annotation present but no codes survived parsing
    #[error("no valid exit codes in annotation of {path:?}")]
    EmptyExitCodes { path: String },

    /// No registered backend claims the path
    #[error("no filesystem backend accepts path {path:?}")]
    Unroutable { path: String },

    /// Process creation failed
    #[error("could not spawn command for pipe {path:?}: {source}")]
    Spawn {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not read from pipe {path:?}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not write to pipe {path:?}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The close primitive itself failed, distinct from a bad exit status
    #[error("could not close pipe {path:?}: {source}")]
    Close {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Process exited normally with a code outside the accepted set
    #[error("pipe command {path:?} exited with code {code}")]
    ExitCode { path: String, code: i32 },

    /// Process was terminated by an uncaught signal
    #[error("pipe command {path:?} terminated by signal {signal}")]
    Signal { path: String, signal: i32 },

    /// Operation that pipes cannot support (seek, reset)
    #[error("cannot {operation} pipe {path:?}")]
    Unsupported {
        path: String,
        operation: &'static str,
    },

    /// Plain I/O error outside any pipe handle (CLI stdin/stdout plumbing)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
