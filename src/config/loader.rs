// src/config/loader.rs

use std::fs;
use std::path::Path;
use std::time::Duration;

use tracing::debug;

use crate::cli::CliArgs;
use crate::config::model::{
    resolve_against, ConfigFile, ReactorConfig, DEFAULT_DEBOUNCE_MS, DEFAULT_IGNORE_FILE,
    DEFAULT_PATTERN,
};
use crate::config::validate::validate_config;
use crate::errors::{RemonError, Result};

/// Read and deserialize a config file. No semantic validation happens here.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let config: ConfigFile = toml::from_str(&contents)?;
    Ok(config)
}

/// Merge CLI flags over an optional config file into a validated
/// [`ReactorConfig`].
///
/// Relative roots resolve against `cwd`. Nothing is checked on disk; the
/// caller canonicalises the watch root.
pub fn resolve(args: &CliArgs, file: Option<ConfigFile>, cwd: &Path) -> Result<ReactorConfig> {
    let section = file.unwrap_or_default().watch;

    let command = args
        .command_line()
        .or(section.command)
        .ok_or_else(|| {
            RemonError::Config("no command given (pass it after `--`)".to_string())
        })?;

    let debounce_ms = args
        .debounce
        .or(section.debounce_ms)
        .unwrap_or(DEFAULT_DEBOUNCE_MS);

    let root = args
        .root
        .clone()
        .or(section.root)
        .map(|r| resolve_against(cwd, &r))
        .unwrap_or_else(|| cwd.to_path_buf());

    let patterns = if !args.patterns.is_empty() {
        args.patterns.clone()
    } else if !section.patterns.is_empty() {
        section.patterns
    } else {
        vec![DEFAULT_PATTERN.to_string()]
    };

    let mut exclude = section.exclude;
    exclude.extend(args.exclude.iter().cloned());

    let use_ignore_files = !args.no_ignore && section.use_ignore_files.unwrap_or(true);

    let cfg = ReactorConfig {
        command,
        debounce: Duration::from_millis(debounce_ms),
        watch_root: root,
        patterns,
        exclude,
        use_ignore_files,
        ignore_files: section
            .ignore_files
            .unwrap_or_else(|| vec![DEFAULT_IGNORE_FILE.to_string()]),
        ignore_scope: args.ignore_scope.or(section.ignore_scope).unwrap_or_default(),
        ignore_roots: section.ignore_roots.unwrap_or_default(),
        run_on_start: args.run_on_start || section.run_on_start.unwrap_or(false),
    };

    validate_config(&cfg)?;
    Ok(cfg)
}

/// Startup entry point: read `--config` if given, merge with the CLI and
/// canonicalise the watch root.
///
/// A missing working directory or watch root is a startup error.
pub fn load_and_resolve(args: &CliArgs) -> Result<ReactorConfig> {
    let cwd = std::env::current_dir().map_err(|e| {
        RemonError::Startup(format!("cannot resolve working directory: {e}"))
    })?;

    let file = match &args.config {
        Some(path) => {
            debug!(?path, "loading config file");
            Some(load_from_path(path)?)
        }
        None => None,
    };

    let mut cfg = resolve(args, file, &cwd)?;

    cfg.watch_root = cfg.watch_root.canonicalize().map_err(|e| {
        RemonError::Startup(format!(
            "watch root {} is not accessible: {e}",
            cfg.watch_root.display()
        ))
    })?;

    if !cfg.watch_root.is_dir() {
        return Err(RemonError::Startup(format!(
            "watch root {} is not a directory",
            cfg.watch_root.display()
        )));
    }

    Ok(cfg)
}
