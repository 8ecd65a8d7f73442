//! Filesystem seam: the backend and handle traits plus the ordered
//! registry that routes paths to backends.
//!
//! Backends are registered into a [`FileSystemRegistry`] and consulted in
//! registration order; the first backend whose [`FileSystem::can_handle`]
//! returns true owns the path. The pipe backend in [`crate::pipe`] is one
//! such backend.

pub mod registry;

pub use registry::FileSystemRegistry;

use std::time::SystemTime;

use crate::config::Config;
use crate::error::FsResult;

/// I/O direction requested by the caller of [`FileSystem::open`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    Read,
    Write,
}

/// A pluggable filesystem backend.
pub trait FileSystem: Send + Sync {
    /// Backend name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Whether this backend recognizes `path`. Pure, no side effects.
    fn can_handle(&self, path: &str) -> bool;

    /// Open a byte stream for `path`.
    fn open(&self, path: &str, mode: OpenMode, config: &Config) -> FsResult<Box<dyn FileHandle>>;
}

/// An open byte stream produced by a [`FileSystem`] backend.
///
/// Handles are owned by a single logical caller. Release is `close()` for
/// callers that need error visibility; dropping a handle releases it too,
/// but routes any failure to the log instead of propagating.
pub trait FileHandle: Send + std::fmt::Debug {
    /// The path this handle was opened with.
    fn path(&self) -> &str;

    /// Read up to `buf.len()` bytes. Returns 0 at end of stream.
    fn read(&mut self, buf: &mut [u8]) -> FsResult<usize>;

    /// Write all of `buf`, returning the number of bytes written.
    fn write(&mut self, buf: &[u8]) -> FsResult<usize>;

    /// Release the stream, surfacing any failure. Idempotent.
    fn close(&mut self) -> FsResult<()>;

    /// Size of the underlying resource in bytes.
    fn file_size(&self) -> u64;

    /// Last modification time of the underlying resource.
    fn last_modified(&self) -> SystemTime;

    /// Rewind the stream to the beginning.
    fn reset(&mut self) -> FsResult<()>;

    /// Whether the stream supports seeking.
    fn can_seek(&self) -> bool {
        true
    }

    /// Whether the stream is a pipe rather than a regular file.
    fn is_pipe(&self) -> bool {
        false
    }

    /// Flush buffered writes to the underlying resource.
    fn sync(&mut self) -> FsResult<()> {
        Ok(())
    }
}
