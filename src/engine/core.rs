// src/engine/core.rs

//! Pure per-batch decisions.
//!
//! No channels, no processes, no IO: these functions take a batch and the
//! current rules and say what should happen.

use std::path::Path;

use crate::config::ReactorConfig;
use crate::filter::IgnoreRuleSet;
use crate::watch::ChangeBatch;

/// Outcome of filtering one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchDecision {
    /// Nothing relevant changed; leave the running command alone.
    Skip { ignored: usize },
    /// Restart the command for these (non-ignored) changes.
    Trigger(ChangeBatch),
}

/// Whether any path in the batch is an ignore file, by basename.
pub fn touches_ignore_file(batch: &ChangeBatch, cfg: &ReactorConfig) -> bool {
    batch
        .all_paths()
        .filter_map(Path::file_name)
        .any(|name| cfg.is_reload_trigger(name))
}

/// Drop ignored paths from `batch`.
///
/// Batch paths are relative to `root` and are joined onto it before
/// matching. Deletions are filtered like any other change. Without rules the
/// batch passes through untouched.
pub fn filter_batch(batch: &ChangeBatch, rules: Option<&IgnoreRuleSet>, root: &Path) -> BatchDecision {
    if batch.is_empty() {
        return BatchDecision::Skip { ignored: 0 };
    }

    let Some(rules) = rules else {
        return BatchDecision::Trigger(batch.clone());
    };

    let relevant = batch.retain(|rel| !rules.matches(&root.join(rel)));
    if relevant.is_empty() {
        BatchDecision::Skip {
            ignored: batch.len(),
        }
    } else {
        BatchDecision::Trigger(relevant)
    }
}
