use serde::{Deserialize, Serialize};

/// Embedded default configuration.
const DEFAULT_CONFIG: &str = include_str!("../config.default.toml");

// ── Final (merged) config types ──

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub pipe: PipeSettings,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct PipeSettings {
    /// Ignore SIGPIPE process-wide when a pipe is opened. Sticky for the
    /// life of the process; see `pipe::process::ignore_sigpipe`.
    #[serde(default)]
    pub ignore_sigpipe: bool,
}

// ── Overlay types (user config that merges with defaults) ──

#[derive(Debug, Deserialize, Default)]
struct ConfigOverlay {
    #[serde(default)]
    pipe: PipeOverlay,
}

#[derive(Debug, Deserialize, Default)]
struct PipeOverlay {
    ignore_sigpipe: Option<bool>,
}

impl Config {
    /// Load the default embedded configuration.
    pub fn default_config() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("embedded default config must parse")
    }

    /// Load configuration with resolution order:
    /// 1. Start with embedded defaults
    /// 2. Merge user overlay from ~/.config/pipefs/config.toml (if exists)
    ///
    /// Scalars set in the user file override the defaults.
    pub fn load() -> Self {
        let mut config = Self::default_config();
        if let Some(overlay) = Self::load_overlay() {
            config.apply_overlay(overlay);
        }
        config
    }

    /// Try to load the user overlay from ~/.config/pipefs/config.toml.
    fn load_overlay() -> Option<ConfigOverlay> {
        let home = std::env::var_os("HOME")?;
        let path = std::path::Path::new(&home).join(".config/pipefs/config.toml");
        let content = std::fs::read_to_string(path).ok()?;
        match toml::from_str(&content) {
            Ok(overlay) => Some(overlay),
            Err(e) => {
                eprintln!("pipefs: config parse error: {e}");
                None
            }
        }
    }

    /// Apply an overlay on top of this config.
    fn apply_overlay(&mut self, overlay: ConfigOverlay) {
        if let Some(v) = overlay.pipe.ignore_sigpipe {
            self.pipe.ignore_sigpipe = v;
        }
    }

    /// Apply an overlay from a TOML string. Used for testing.
    #[cfg(test)]
    fn apply_overlay_str(&mut self, toml_str: &str) {
        let overlay: ConfigOverlay = toml::from_str(toml_str).unwrap();
        self.apply_overlay(overlay);
    }
}
