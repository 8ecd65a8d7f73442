//! Popen-equivalent process plumbing: spawn a shell command with one end
//! of a pipe attached, buffered I/O over that end, and a blocking wait.

use std::io::{self, BufReader, BufWriter, Read, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, ExitStatus, Stdio};

use crate::vfs::OpenMode;

/// Buffered stream over the piped end of a spawned process.
#[derive(Debug)]
enum PipeStream {
    Reader(BufReader<ChildStdout>),
    Writer(BufWriter<ChildStdin>),
}

/// A running shell command with one end of a pipe attached: its stdout for
/// read-mode, its stdin for write-mode, never both.
#[derive(Debug)]
pub struct ShellChild {
    child: Child,
    stream: PipeStream,
}

impl ShellChild {
    /// Spawn `command` via `/bin/sh -c`, piping stdout (read-mode) or
    /// stdin (write-mode). The other standard streams are inherited.
    pub fn spawn(command: &str, mode: OpenMode) -> io::Result<Self> {
        let mut cmd = Command::new("/bin/sh");
        cmd.arg("-c").arg(command);
        match mode {
            OpenMode::Read => cmd.stdout(Stdio::piped()),
            OpenMode::Write => cmd.stdin(Stdio::piped()),
        };
        let mut child = cmd.spawn()?;
        let stream = match mode {
            OpenMode::Read => {
                let stdout = child.stdout.take().expect("stdout was piped");
                PipeStream::Reader(BufReader::new(stdout))
            }
            OpenMode::Write => {
                let stdin = child.stdin.take().expect("stdin was piped");
                PipeStream::Writer(BufWriter::new(stdin))
            }
        };
        Ok(Self { child, stream })
    }

    /// Read from the process's stdout. Fails on a write-mode pipe.
    pub fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match &mut self.stream {
            PipeStream::Reader(reader) => reader.read(buf),
            PipeStream::Writer(_) => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "pipe is open for writing",
            )),
        }
    }

    /// Write to the process's stdin. Fails on a read-mode pipe.
    pub fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.stream {
            PipeStream::Writer(writer) => writer.write(buf),
            PipeStream::Reader(_) => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "pipe is open for reading",
            )),
        }
    }

    /// Flush and drop our end of the pipe, then wait for the process to
    /// exit. The child is always reaped, even when the flush fails; a
    /// flush error takes precedence over the exit status.
    pub fn finish(self) -> io::Result<ExitStatus> {
        let Self { mut child, stream } = self;
        let flushed = match stream {
            PipeStream::Writer(mut writer) => writer.flush(),
            PipeStream::Reader(_) => Ok(()),
        };
        // Our pipe end is gone: the child sees EOF on stdin, or loses
        // its stdout reader.
        let status = child.wait();
        flushed?;
        status
    }
}

/// Ignore SIGPIPE for the remainder of the process.
///
/// Process-global state with no teardown: once set, every write in this
/// process to a closed downstream pipe reports EPIPE instead of raising
/// SIGPIPE. Safe to call repeatedly; only the first call changes the
/// disposition.
#[cfg(unix)]
pub fn ignore_sigpipe() {
    use std::sync::Once;

    static IGNORE: Once = Once::new();
    IGNORE.call_once(|| unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_IGN);
    });
}

#[cfg(not(unix))]
pub fn ignore_sigpipe() {}
