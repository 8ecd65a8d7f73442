//! pipefs: stream bytes through a shell pipe path.
//!
//! Usage:
//!   pipefs '<command>|'   run the command, copy its stdout to ours
//!   pipefs '|<command>'   run the command, copy our stdin to its stdin
//!
//! Read paths may carry an exit-code annotation:
//!   pipefs 'grep needle file{allowed_exit_codes=0,1}|'
//!
//! The pipe is closed explicitly before exit, so a disallowed exit code
//! or signal termination fails the run.

use std::io::{Read, Write};

use pipefs::config::Config;
use pipefs::{FileSystemRegistry, FsResult, OpenMode, PipeFileSystem};

const CHUNK: usize = 64 * 1024;

fn main() {
    pipefs::logging::init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: pipefs '<command>|'  (read)  or  pipefs '|<command>'  (write)");
        std::process::exit(1);
    };

    if let Err(err) = run(&path) {
        eprintln!("pipefs: {err}");
        std::process::exit(1);
    }
}

fn run(path: &str) -> FsResult<()> {
    let config = Config::load();
    let mut registry = FileSystemRegistry::new();
    registry.register(Box::new(PipeFileSystem));

    let mode = if path.starts_with('|') {
        OpenMode::Write
    } else {
        OpenMode::Read
    };
    let mut handle = registry.open(path, mode, &config)?;
    let mut buf = vec![0u8; CHUNK];

    match mode {
        OpenMode::Read => {
            let mut stdout = std::io::stdout().lock();
            loop {
                let n = handle.read(&mut buf)?;
                if n == 0 {
                    break;
                }
                stdout.write_all(&buf[..n])?;
            }
            stdout.flush()?;
        }
        OpenMode::Write => {
            let mut stdin = std::io::stdin().lock();
            loop {
                let n = stdin.read(&mut buf)?;
                if n == 0 {
                    break;
                }
                handle.write(&buf[..n])?;
            }
        }
    }

    handle.close()
}
