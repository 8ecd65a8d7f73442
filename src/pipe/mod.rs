//! The pipe filesystem backend: paths whose first or last character is
//! `|` name a shell command instead of a file.
//!
//! A leading marker opens the command's stdin for writing (`"|gzip >
//! out.gz"`); a trailing marker opens its stdout for reading
//! (`"zcat data.gz|"`). When the stream is closed — explicitly or by the
//! zero-byte read at end of stream — the process is reaped and its exit
//! status is checked against the handle's accepted exit codes.

mod process;

use std::collections::BTreeSet;
use std::process::ExitStatus;
use std::time::SystemTime;

use crate::config::Config;
use crate::error::{FsError, FsResult};
use crate::parse::{self, PIPE_MARKER, PipeCommand};
use crate::vfs::{FileHandle, FileSystem, OpenMode};
use process::ShellChild;

/// Largest single write handed to the underlying primitive, sized for
/// fwrite-style primitives that take a 32-bit count.
const MAX_WRITE_CHUNK: usize = i32::MAX as usize;

/// Filesystem backend that runs shell commands behind pipe paths.
pub struct PipeFileSystem;

impl FileSystem for PipeFileSystem {
    fn name(&self) -> &'static str {
        "pipefs"
    }

    /// A path is ours when it is non-empty and starts or ends with `|`.
    fn can_handle(&self, path: &str) -> bool {
        !path.is_empty() && (path.starts_with(PIPE_MARKER) || path.ends_with(PIPE_MARKER))
    }

    /// Open a pipe stream for `path`.
    ///
    /// Direction comes from the path itself — a leading marker means
    /// write-to-stdin, a trailing marker means read-from-stdout — so the
    /// caller's requested `mode` is not consulted. A leading marker wins
    /// when both are present.
    fn open(&self, path: &str, _mode: OpenMode, config: &Config) -> FsResult<Box<dyn FileHandle>> {
        if config.pipe.ignore_sigpipe {
            process::ignore_sigpipe();
        }

        let (command, direction, allowed_exit_codes) = match path.strip_prefix(PIPE_MARKER) {
            // Write mode: the rest of the path is the command, verbatim.
            Some(rest) => (rest.to_string(), OpenMode::Write, BTreeSet::from([0])),
            None => {
                let PipeCommand {
                    command,
                    allowed_exit_codes,
                } = parse::parse_read_command(path)?;
                (command, OpenMode::Read, allowed_exit_codes)
            }
        };

        let child = ShellChild::spawn(&command, direction).map_err(|source| FsError::Spawn {
            path: path.to_string(),
            source,
        })?;

        Ok(Box::new(PipeHandle {
            path: path.to_string(),
            child: Some(child),
            allowed_exit_codes,
        }))
    }
}

/// An open pipe stream and the process behind it.
///
/// `child` becomes `None` exactly once, at close. The exit status is
/// interpreted only after the child has been taken out of the handle, so
/// a close that fails still leaves the handle closed and a second close
/// cannot wait twice.
#[derive(Debug)]
pub struct PipeHandle {
    path: String,
    child: Option<ShellChild>,
    allowed_exit_codes: BTreeSet<i32>,
}

impl PipeHandle {
    /// Check a wait status against the accepted exit codes.
    fn check_status(&self, status: ExitStatus) -> FsResult<()> {
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            // Signal termination is never accepted.
            if let Some(signal) = status.signal() {
                return Err(FsError::Signal {
                    path: self.path.clone(),
                    signal,
                });
            }
        }
        // Without signal decomposition the raw code is checked directly.
        match status.code() {
            Some(code) if !self.allowed_exit_codes.contains(&code) => Err(FsError::ExitCode {
                path: self.path.clone(),
                code,
            }),
            _ => Ok(()),
        }
    }
}

impl FileHandle for PipeHandle {
    fn path(&self) -> &str {
        &self.path
    }

    fn read(&mut self, buf: &mut [u8]) -> FsResult<usize> {
        let Some(child) = self.child.as_mut() else {
            // Already closed: idempotent end of stream.
            return Ok(0);
        };
        let n = child.read(buf).map_err(|source| FsError::Read {
            path: self.path.clone(),
            source,
        })?;
        if n == 0 {
            // End of stream: reap the process here so a disallowed exit
            // code surfaces from this call rather than from a destructor.
            self.close()?;
        }
        Ok(n)
    }

    fn write(&mut self, buf: &[u8]) -> FsResult<usize> {
        let Some(child) = self.child.as_mut() else {
            return Err(FsError::Write {
                path: self.path.clone(),
                source: std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe is closed"),
            });
        };
        let mut written = 0;
        while written < buf.len() {
            let end = buf.len().min(written + MAX_WRITE_CHUNK);
            let n = child
                .write(&buf[written..end])
                .map_err(|source| FsError::Write {
                    path: self.path.clone(),
                    source,
                })?;
            if n == 0 {
                return Err(FsError::Write {
                    path: self.path.clone(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::WriteZero,
                        "write accepted no bytes",
                    ),
                });
            }
            written += n;
        }
        Ok(written)
    }

    fn close(&mut self) -> FsResult<()> {
        let Some(child) = self.child.take() else {
            return Ok(());
        };
        let status = child.finish().map_err(|source| FsError::Close {
            path: self.path.clone(),
            source,
        })?;
        self.check_status(status)
    }

    /// Pipes have no knowable size; 0 keeps callers from sizing buffers
    /// off a bogus value.
    fn file_size(&self) -> u64 {
        0
    }

    fn last_modified(&self) -> SystemTime {
        SystemTime::UNIX_EPOCH
    }

    fn reset(&mut self) -> FsResult<()> {
        Err(FsError::Unsupported {
            path: self.path.clone(),
            operation: "reset",
        })
    }

    fn can_seek(&self) -> bool {
        false
    }

    fn is_pipe(&self) -> bool {
        true
    }

    fn sync(&mut self) -> FsResult<()> {
        Ok(())
    }
}

impl Drop for PipeHandle {
    /// Implicit release: failures are logged, never propagated.
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            log::warn!("closing pipe on release: {err}");
        }
    }
}
