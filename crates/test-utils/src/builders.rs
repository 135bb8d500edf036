#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use remon::config::{validate_config, ReactorConfig};
use remon::types::IgnoreScope;
use remon::watch::ChangeBatch;

/// Builder for `ReactorConfig` to simplify test setup.
pub struct ConfigBuilder {
    config: ReactorConfig,
}

impl ConfigBuilder {
    pub fn new(command: &str, root: impl AsRef<Path>) -> Self {
        Self {
            config: ReactorConfig::new(command, root.as_ref()),
        }
    }

    pub fn debounce_ms(mut self, ms: u64) -> Self {
        self.config.debounce = Duration::from_millis(ms);
        self
    }

    pub fn pattern(mut self, pattern: &str) -> Self {
        if self.config.patterns == ["**"] {
            self.config.patterns.clear();
        }
        self.config.patterns.push(pattern.to_string());
        self
    }

    pub fn exclude(mut self, pattern: &str) -> Self {
        self.config.exclude.push(pattern.to_string());
        self
    }

    pub fn no_ignore(mut self) -> Self {
        self.config.use_ignore_files = false;
        self
    }

    pub fn ignore_file(mut self, name: &str) -> Self {
        self.config.ignore_files.push(name.to_string());
        self
    }

    pub fn ignore_scope(mut self, scope: IgnoreScope) -> Self {
        self.config.ignore_scope = scope;
        self
    }

    pub fn ignore_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.ignore_roots.push(root.into());
        self
    }

    pub fn run_on_start(mut self, val: bool) -> Self {
        self.config.run_on_start = val;
        self
    }

    pub fn build(self) -> ReactorConfig {
        validate_config(&self.config).expect("Failed to build valid config from builder");
        self.config
    }
}

fn paths(list: &[&str]) -> Vec<PathBuf> {
    list.iter().map(PathBuf::from).collect()
}

pub fn batch(added: &[&str], changed: &[&str], deleted: &[&str]) -> ChangeBatch {
    ChangeBatch::new(paths(added), paths(changed), paths(deleted))
}

pub fn added(list: &[&str]) -> ChangeBatch {
    batch(list, &[], &[])
}

pub fn changed(list: &[&str]) -> ChangeBatch {
    batch(&[], list, &[])
}

pub fn deleted(list: &[&str]) -> ChangeBatch {
    batch(&[], &[], list)
}
