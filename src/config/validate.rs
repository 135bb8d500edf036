// src/config/validate.rs

use globset::Glob;

use crate::config::model::ReactorConfig;
use crate::errors::{RemonError, Result};

/// Check the semantic invariants of a resolved config.
pub fn validate_config(cfg: &ReactorConfig) -> Result<()> {
    validate_command(cfg)?;
    validate_debounce(cfg)?;
    validate_globs("pattern", &cfg.patterns)?;
    validate_globs("exclude", &cfg.exclude)?;
    validate_ignore_files(cfg)?;
    Ok(())
}

fn validate_command(cfg: &ReactorConfig) -> Result<()> {
    if cfg.command.trim().is_empty() {
        return Err(RemonError::Config("command must not be empty".to_string()));
    }
    Ok(())
}

fn validate_debounce(cfg: &ReactorConfig) -> Result<()> {
    if cfg.debounce.is_zero() {
        return Err(RemonError::Config(
            "debounce must be >= 1 ms (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_globs(kind: &str, patterns: &[String]) -> Result<()> {
    for pat in patterns {
        Glob::new(pat).map_err(|e| {
            RemonError::Config(format!("invalid {kind} glob '{pat}': {e}"))
        })?;
    }
    Ok(())
}

fn validate_ignore_files(cfg: &ReactorConfig) -> Result<()> {
    if !cfg.use_ignore_files {
        return Ok(());
    }
    if cfg.ignore_files.is_empty() {
        return Err(RemonError::Config(
            "ignore_files must name at least one file when ignore files are enabled"
                .to_string(),
        ));
    }
    for name in &cfg.ignore_files {
        if name.is_empty() || name.contains('/') || name.contains('\\') {
            return Err(RemonError::Config(format!(
                "ignore file '{name}' must be a bare file name"
            )));
        }
    }
    Ok(())
}
