use log::LevelFilter;
use simplelog::{ColorChoice, TermLogger, TerminalMode};

/// Initialize stderr logging for the pipefs binary.
///
/// The level comes from the `PIPEFS_LOG` environment variable (error,
/// warn, info, debug, trace); default is warn. Best-effort: a second init
/// is ignored (logging must never abort the stream).
pub fn init() {
    let level = std::env::var("PIPEFS_LOG")
        .ok()
        .and_then(|v| v.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Warn);

    let _ = TermLogger::init(
        level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
}
