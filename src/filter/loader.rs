// src/filter/loader.rs

//! Ignore-file discovery and rule set construction.

use std::collections::VecDeque;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use tracing::{debug, info, warn};

use crate::config::ReactorConfig;
use crate::errors::{RemonError, Result};
use crate::filter::rules::{is_ignored_by, IgnoreRuleSet};
use crate::fs::FileSystem;
use crate::types::IgnoreScope;

/// Builds [`IgnoreRuleSet`]s from ignore files found under a set of roots.
///
/// Loading degrades per root: an unreadable root is logged and skipped, an
/// unreadable or partly invalid ignore file contributes whatever it can.
#[derive(Debug, Clone)]
pub struct IgnoreLoader {
    fs: Arc<dyn FileSystem>,
    roots: Vec<PathBuf>,
    file_names: Vec<String>,
    scope: IgnoreScope,
}

impl IgnoreLoader {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        roots: Vec<PathBuf>,
        file_names: Vec<String>,
        scope: IgnoreScope,
    ) -> Self {
        Self {
            fs,
            roots,
            file_names,
            scope,
        }
    }

    pub fn from_config(cfg: &ReactorConfig, fs: Arc<dyn FileSystem>) -> Self {
        Self::new(
            fs,
            cfg.effective_ignore_roots(),
            cfg.ignore_files.clone(),
            cfg.ignore_scope,
        )
    }

    /// Build a fresh rule set from every root.
    ///
    /// Returns `None` ("no rules available") only when not a single root
    /// could be read. A readable root without ignore files yields an empty
    /// set that excludes nothing.
    pub fn load(&self) -> Option<IgnoreRuleSet> {
        let mut matchers = Vec::new();
        let mut readable_roots = 0usize;

        for root in &self.roots {
            match self.load_root(root) {
                Ok(mut found) => {
                    readable_roots += 1;
                    matchers.append(&mut found);
                }
                Err(err) => {
                    warn!(error = %err, "skipping ignore root");
                }
            }
        }

        if readable_roots == 0 {
            warn!(roots = ?self.roots, "no ignore root could be read; no ignore rules available");
            return None;
        }

        let rules = IgnoreRuleSet::new(matchers);
        info!(
            files = rules.len(),
            patterns = rules.num_patterns(),
            "ignore rules loaded"
        );
        Some(rules)
    }

    /// Breadth-first walk of one root, so matchers come out shallow to deep.
    fn load_root(&self, root: &Path) -> Result<Vec<Gitignore>> {
        let mut matchers: Vec<Gitignore> = Vec::new();
        let mut queue = VecDeque::from([root.to_path_buf()]);

        while let Some(dir) = queue.pop_front() {
            let entries = match self.fs.read_dir(&dir) {
                Ok(entries) => entries,
                Err(source) if dir.as_path() == root => {
                    return Err(RemonError::IgnoreLoad {
                        root: root.to_path_buf(),
                        source,
                    });
                }
                Err(err) => {
                    warn!(dir = ?dir, error = %err, "cannot read directory; skipping its ignore files");
                    continue;
                }
            };

            for name in &self.file_names {
                let candidate = dir.join(name);
                if !self.fs.is_file(&candidate) {
                    continue;
                }
                match self.compile(&candidate) {
                    Ok(Some(matcher)) => matchers.push(matcher),
                    Ok(None) => debug!(file = ?candidate, "ignore file has no patterns"),
                    Err(err) => {
                        warn!(file = ?candidate, error = %err, "skipping unreadable ignore file");
                    }
                }
            }

            if self.scope == IgnoreScope::RootOnly {
                break;
            }

            for entry in entries {
                if !self.fs.is_dir(&entry) || self.fs.is_symlink(&entry) {
                    continue;
                }
                if entry.file_name() == Some(OsStr::new(".git")) {
                    continue;
                }
                // Nothing below an ignored directory can matter.
                if is_ignored_by(&matchers, &entry, true) {
                    debug!(dir = ?entry, "not descending into ignored directory");
                    continue;
                }
                queue.push_back(entry);
            }
        }

        Ok(matchers)
    }

    /// Compile one ignore file into a matcher anchored at its directory.
    fn compile(&self, file: &Path) -> anyhow::Result<Option<Gitignore>> {
        let contents = self.fs.read_to_string(file)?;
        let dir = file
            .parent()
            .with_context(|| format!("ignore file {:?} has no parent directory", file))?;

        let mut builder = GitignoreBuilder::new(dir);
        for line in contents.lines() {
            if let Err(err) = builder.add_line(Some(file.to_path_buf()), line) {
                warn!(file = ?file, line, error = %err, "skipping invalid ignore pattern");
            }
        }

        let matcher = builder
            .build()
            .with_context(|| format!("compiling ignore file {:?}", file))?;

        if matcher.is_empty() {
            Ok(None)
        } else {
            Ok(Some(matcher))
        }
    }
}
