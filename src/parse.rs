//! Read-mode pipe path parsing: command extraction and the optional
//! exit-code annotation.
//!
//! A read-mode path is `<command>|` or `<command>{allowed_exit_codes=<csv>}|`.
//! The annotation is recognized only when its closing brace sits immediately
//! before the final marker; brace text anywhere else belongs to the command.

use std::collections::BTreeSet;

use crate::error::{FsError, FsResult};

/// Marker character that routes a path to the pipe filesystem.
pub const PIPE_MARKER: char = '|';

/// Opening delimiter of the exit-code annotation.
const ANNOTATION_PREFIX: &str = "{allowed_exit_codes=";

/// A parsed read-mode pipe path: the command to run and the process exit
/// codes treated as success when the stream is closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipeCommand {
    /// Shell command text, trimmed of surrounding whitespace.
    pub command: String,
    /// Accepted exit codes; never empty, defaults to `{0}`.
    pub allowed_exit_codes: BTreeSet<i32>,
}

/// Parse a read-mode pipe path.
///
/// The path must end with `|`. If the text before the marker ends with an
/// `{allowed_exit_codes=<csv>}` annotation, the CSV is parsed into the
/// accepted set; otherwise the set defaults to `{0}`. The search for the
/// annotation runs backward from the end so a command that legitimately
/// contains braces elsewhere is not misparsed.
pub fn parse_read_command(path: &str) -> FsResult<PipeCommand> {
    let Some(body) = path.strip_suffix(PIPE_MARKER) else {
        return Err(FsError::MissingMarker {
            path: path.to_string(),
        });
    };

    // Annotation only counts when its closing brace touches the marker.
    if body.ends_with('}')
        && let Some(start) = body.rfind(ANNOTATION_PREFIX)
    {
        let csv = &body[start + ANNOTATION_PREFIX.len()..body.len() - 1];
        let allowed_exit_codes = parse_exit_codes(path, csv)?;
        return Ok(PipeCommand {
            command: body[..start].trim().to_string(),
            allowed_exit_codes,
        });
    }

    Ok(PipeCommand {
        command: body.trim().to_string(),
        allowed_exit_codes: BTreeSet::from([0]),
    })
}

/// Parse the annotation CSV into a deduplicated set of exit codes.
///
/// Tokens are trimmed; empty tokens (leading/trailing/doubled commas) are
/// skipped. Every remaining token must be a string of decimal digits that
/// fits in an i32.
fn parse_exit_codes(path: &str, csv: &str) -> FsResult<BTreeSet<i32>> {
    let mut codes = BTreeSet::new();
    for token in csv.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        if !token.bytes().all(|b| b.is_ascii_digit()) {
            return Err(FsError::InvalidExitCode {
                path: path.to_string(),
                token: token.to_string(),
            });
        }
        let code = token
            .parse::<i32>()
            .map_err(|_| FsError::ExitCodeOutOfRange {
                path: path.to_string(),
                token: token.to_string(),
            })?;
        codes.insert(code);
    }
    if codes.is_empty() {
        return Err(FsError::EmptyExitCodes {
            path: path.to_string(),
        });
    }
    Ok(codes)
}
