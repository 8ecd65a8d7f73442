//! End-to-end tests that spawn real `/bin/sh` commands through the pipe
//! backend.

#![cfg(unix)]

use pipefs::error::FsError;
use pipefs::{FileHandle, FileSystem, OpenMode, PipeFileSystem};

/// Open a pipe path, picking the mode the way the CLI does.
fn open(path: &str) -> Box<dyn FileHandle> {
    let mode = if path.starts_with('|') {
        OpenMode::Write
    } else {
        OpenMode::Read
    };
    pipefs::open(path, mode).expect("open pipe")
}

/// Read until end of stream, returning the bytes. The final zero-byte
/// read reaps the process, so a bad exit status surfaces here.
fn drain(handle: &mut dyn FileHandle) -> Result<Vec<u8>, FsError> {
    let mut out = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        let n = handle.read(&mut buf)?;
        if n == 0 {
            return Ok(out);
        }
        out.extend_from_slice(&buf[..n]);
    }
}

// ── Reading ──

#[test]
fn read_command_output() {
    let mut handle = open("printf 'abc'|");
    assert_eq!(drain(handle.as_mut()).unwrap(), b"abc");
}

#[test]
fn read_multi_chunk_output() {
    let mut handle = open("seq 1 2000|");
    let expected: String = (1..=2000).map(|n| format!("{n}\n")).collect();
    assert_eq!(drain(handle.as_mut()).unwrap(), expected.as_bytes());
}

#[test]
fn read_after_end_of_stream_returns_zero() {
    let mut handle = open("printf 'abc'|");
    drain(handle.as_mut()).unwrap();
    // The zero-byte read already closed the handle.
    let mut buf = [0u8; 16];
    assert_eq!(handle.read(&mut buf).unwrap(), 0);
}

#[test]
fn close_after_auto_close_is_noop() {
    let mut handle = open("printf 'abc'|");
    drain(handle.as_mut()).unwrap();
    handle.close().unwrap();
    handle.close().unwrap();
}

#[test]
fn disallowed_exit_code_reported_at_end_of_stream() {
    let mut handle = open("exit 3|");
    let err = drain(handle.as_mut()).unwrap_err();
    assert!(matches!(err, FsError::ExitCode { code: 3, .. }), "{err}");
}

#[test]
fn annotated_exit_code_accepted() {
    let mut handle = open("exit 3{allowed_exit_codes=3}|");
    assert_eq!(drain(handle.as_mut()).unwrap(), b"");
    handle.close().unwrap();
}

#[test]
fn annotated_codes_still_reject_others() {
    let mut handle = open("exit 4{allowed_exit_codes=2,3}|");
    let err = drain(handle.as_mut()).unwrap_err();
    assert!(matches!(err, FsError::ExitCode { code: 4, .. }), "{err}");
}

#[test]
fn disallowed_exit_code_reported_by_explicit_close() {
    let mut handle = open("exit 3|");
    let err = handle.close().unwrap_err();
    assert!(matches!(err, FsError::ExitCode { code: 3, .. }), "{err}");
    // The handle is closed despite the error.
    handle.close().unwrap();
}

#[test]
fn signal_termination_reported() {
    let mut handle = open("kill -KILL $$|");
    let err = drain(handle.as_mut()).unwrap_err();
    assert!(matches!(err, FsError::Signal { signal: 9, .. }), "{err}");
}

#[test]
fn signal_termination_not_excused_by_annotation() {
    // 137 is the shell convention for SIGKILL, but the process did not
    // exit — it was killed, which is never accepted.
    let mut handle = open("kill -KILL $${allowed_exit_codes=137}|");
    let err = drain(handle.as_mut()).unwrap_err();
    assert!(matches!(err, FsError::Signal { signal: 9, .. }), "{err}");
}

// ── Writing ──

#[test]
fn write_reaches_sink() {
    let dir = tempfile::tempdir().unwrap();
    let sink = dir.path().join("out");
    let mut handle = open(&format!("|cat > {}", sink.display()));
    let payload = b"hello through the pipe\n";
    assert_eq!(handle.write(payload).unwrap(), payload.len());
    handle.close().unwrap();
    assert_eq!(std::fs::read(&sink).unwrap(), payload);
}

#[test]
fn write_mode_requires_exit_code_zero() {
    let mut handle = open("|exit 7");
    let err = handle.close().unwrap_err();
    assert!(matches!(err, FsError::ExitCode { code: 7, .. }), "{err}");
}

#[test]
fn write_after_close_fails() {
    let mut handle = open("|cat > /dev/null");
    handle.close().unwrap();
    let err = handle.write(b"late").unwrap_err();
    assert!(matches!(err, FsError::Write { .. }), "{err}");
}

#[test]
fn read_on_write_handle_fails() {
    let mut handle = open("|cat > /dev/null");
    let mut buf = [0u8; 8];
    let err = handle.read(&mut buf).unwrap_err();
    assert!(matches!(err, FsError::Read { .. }), "{err}");
    handle.close().unwrap();
}

// ── Sentinels ──

#[test]
fn pipe_metadata_sentinels() {
    let mut handle = open("printf ''|");
    assert_eq!(handle.path(), "printf ''|");
    assert_eq!(handle.file_size(), 0);
    assert_eq!(handle.last_modified(), std::time::SystemTime::UNIX_EPOCH);
    assert!(!handle.can_seek());
    assert!(handle.is_pipe());
    assert!(matches!(
        handle.reset(),
        Err(FsError::Unsupported { operation: "reset", .. })
    ));
    drain(handle.as_mut()).unwrap();
}

// ── Routing ──

#[test]
fn can_handle_marker_paths_only() {
    let fs = PipeFileSystem;
    assert_eq!(fs.name(), "pipefs");
    assert!(fs.can_handle("|echo hi"));
    assert!(fs.can_handle("echo hi|"));
    assert!(!fs.can_handle("echo hi"));
    assert!(!fs.can_handle(""));
}

#[test]
fn unmarked_path_is_not_routable() {
    let err = pipefs::open("plain.csv", OpenMode::Read).unwrap_err();
    assert!(matches!(err, FsError::Unroutable { .. }), "{err}");
}

#[test]
fn malformed_annotation_fails_open() {
    let err = pipefs::open("cmd{allowed_exit_codes=abc}|", OpenMode::Read).unwrap_err();
    assert!(matches!(err, FsError::InvalidExitCode { token, .. } if token == "abc"));
}

// ── Release ──

#[test]
fn drop_swallows_termination_errors() {
    // Exit code 9 is not accepted; dropping must log, not panic.
    let handle = open("exit 9|");
    drop(handle);
}

#[test]
fn independent_handles_do_not_interfere() {
    let mut a = open("printf 'first'|");
    let mut b = open("printf 'second'|");
    assert_eq!(drain(b.as_mut()).unwrap(), b"second");
    assert_eq!(drain(a.as_mut()).unwrap(), b"first");
}
