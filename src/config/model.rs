// src/config/model.rs

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::types::IgnoreScope;

pub const DEFAULT_DEBOUNCE_MS: u64 = 500;
pub const DEFAULT_PATTERN: &str = "**";
pub const DEFAULT_IGNORE_FILE: &str = ".gitignore";

/// Optional configuration file.
///
/// ```toml
/// [watch]
/// command = "cargo test"
/// debounce_ms = 300
/// patterns = ["src/**/*.rs"]
/// exclude = ["**/*.tmp"]
/// ignore_scope = "root-only"
/// ```
///
/// Every key is optional; anything given on the command line wins.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub watch: WatchSection,
}

/// `[watch]` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WatchSection {
    pub command: Option<String>,
    pub debounce_ms: Option<u64>,
    pub root: Option<PathBuf>,
    #[serde(default)]
    pub patterns: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
    pub use_ignore_files: Option<bool>,
    pub ignore_files: Option<Vec<String>>,
    pub ignore_scope: Option<IgnoreScope>,
    pub ignore_roots: Option<Vec<PathBuf>>,
    pub run_on_start: Option<bool>,
}

/// Fully resolved, immutable configuration.
///
/// Built once at startup and handed by reference to the reactor, the
/// ignore loader and the change monitor.
#[derive(Debug, Clone)]
pub struct ReactorConfig {
    /// Shell command line run on every trigger.
    pub command: String,
    pub debounce: Duration,
    /// Base directory of the watch; batch paths are relative to it.
    pub watch_root: PathBuf,
    /// Include globs handed to the change monitor.
    pub patterns: Vec<String>,
    /// Exclude globs handed to the change monitor.
    pub exclude: Vec<String>,
    pub use_ignore_files: bool,
    /// Ignore file basenames. A change to any of them reloads the rules.
    pub ignore_files: Vec<String>,
    pub ignore_scope: IgnoreScope,
    /// Extra roots for ignore discovery. Empty means just `watch_root`.
    pub ignore_roots: Vec<PathBuf>,
    pub run_on_start: bool,
}

impl ReactorConfig {
    /// A config with every optional setting at its default.
    pub fn new(command: impl Into<String>, watch_root: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            watch_root: watch_root.into(),
            patterns: vec![DEFAULT_PATTERN.to_string()],
            exclude: Vec::new(),
            use_ignore_files: true,
            ignore_files: vec![DEFAULT_IGNORE_FILE.to_string()],
            ignore_scope: IgnoreScope::default(),
            ignore_roots: Vec::new(),
            run_on_start: false,
        }
    }

    /// Whether a changed file with this basename should reload ignore rules.
    pub fn is_reload_trigger(&self, file_name: &OsStr) -> bool {
        self.use_ignore_files
            && self
                .ignore_files
                .iter()
                .any(|name| OsStr::new(name) == file_name)
    }

    /// Roots scanned for ignore files, resolved against `watch_root`.
    pub fn effective_ignore_roots(&self) -> Vec<PathBuf> {
        if self.ignore_roots.is_empty() {
            return vec![self.watch_root.clone()];
        }
        self.ignore_roots
            .iter()
            .map(|r| resolve_against(&self.watch_root, r))
            .collect()
    }
}

pub(crate) fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
