// src/watch/patterns.rs

use std::fmt;

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::config::ReactorConfig;

/// Repository metadata. Changes here are never source changes.
const ALWAYS_EXCLUDED: &[&str] = &["**/.git", "**/.git/**"];

/// Compiled include / exclude globs, evaluated against root-relative paths
/// such as `"src/main.rs"`.
#[derive(Clone)]
pub struct PatternSet {
    include: GlobSet,
    exclude: GlobSet,
}

impl fmt::Debug for PatternSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternSet")
            .field("include", &self.include.len())
            .field("exclude", &self.exclude.len())
            .finish()
    }
}

impl PatternSet {
    /// An empty include list means "everything". Anything inside a `.git`
    /// directory is excluded on top of `exclude`.
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self> {
        let include = if include.is_empty() {
            build_globset(&["**".to_string()])
        } else {
            build_globset(include)
        }
        .context("building include globset")?;

        let exclude: Vec<String> = ALWAYS_EXCLUDED
            .iter()
            .map(|p| p.to_string())
            .chain(exclude.iter().cloned())
            .collect();
        let exclude = build_globset(&exclude).context("building exclude globset")?;

        Ok(Self { include, exclude })
    }

    pub fn from_config(cfg: &ReactorConfig) -> Result<Self> {
        Self::new(&cfg.patterns, &cfg.exclude)
    }

    pub fn matches(&self, rel_path: &str) -> bool {
        self.include.is_match(rel_path) && !self.exclude.is_match(rel_path)
    }
}

/// Build a GlobSet from simple string patterns.
fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat).with_context(|| format!("invalid glob pattern: {pat}"))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}
