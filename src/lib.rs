//! pipefs: shell command pipes as file-like streams.
//!
//! A path that starts or ends with `|` names a shell command rather than
//! a file: `"zcat data.gz|"` reads the command's stdout, `"|gzip >
//! out.gz"` writes to its stdin. Read paths may carry an exit-code
//! annotation, `"grep needle file{allowed_exit_codes=0,1}|"`, naming the
//! process exit codes treated as success when the stream is closed.
//! Signal termination is never treated as success.
//!
//! # Architecture
//!
//! - **[`parse`]** — Read-path parsing: command extraction, exit-code annotation.
//! - **[`vfs`]** — Filesystem seam: backend/handle traits and the ordered registry.
//! - **[`pipe`]** — The pipe backend: process spawning, buffered I/O, close-time
//!   exit-status interpretation, SIGPIPE disposition.
//! - **[`config`]** — Configuration loading: embedded defaults + user overlay merge.
//! - **[`error`]** — Error types for parse and pipe I/O failures.
//! - **[`logging`]** — Stderr logging setup for the CLI.

/// Configuration types, loading, and overlay merge logic.
pub mod config;
/// Error enum and result alias shared by every operation.
pub mod error;
/// Stderr logging setup.
pub mod logging;
/// Pipe path parsing: command text and the exit-code annotation.
pub mod parse;
/// The pipe backend: process lifecycle behind a file handle.
pub mod pipe;
/// Backend and handle traits plus the routing registry.
pub mod vfs;

pub use error::{FsError, FsResult};
pub use pipe::PipeFileSystem;
pub use vfs::{FileHandle, FileSystem, FileSystemRegistry, OpenMode};

use config::Config;

/// Open a pipe path with default configuration.
///
/// Builds a one-backend registry and routes `path` through it. This is
/// the main entry point for tests and simple usage; hosts embedding
/// several backends build a [`FileSystemRegistry`] directly.
pub fn open(path: &str, mode: OpenMode) -> FsResult<Box<dyn FileHandle>> {
    let config = Config::default_config();
    let mut registry = FileSystemRegistry::new();
    registry.register(Box::new(PipeFileSystem));
    registry.open(path, mode, &config)
}
