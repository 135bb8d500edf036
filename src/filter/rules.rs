// src/filter/rules.rs

use std::fmt;
use std::path::Path;

use ignore::gitignore::Gitignore;
use ignore::Match;

/// Ordered ignore matchers, one per ignore file, shallowest first.
///
/// Queries walk the matchers from last to first and stop at the first one
/// with an opinion, so a deeper file (or a later root) overrides an earlier
/// one. Inside a single file the gitignore matcher already applies
/// last-pattern-wins, including `!` re-includes.
#[derive(Clone, Default)]
pub struct IgnoreRuleSet {
    matchers: Vec<Gitignore>,
}

impl fmt::Debug for IgnoreRuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IgnoreRuleSet")
            .field("files", &self.sources().collect::<Vec<_>>())
            .field("patterns", &self.num_patterns())
            .finish()
    }
}

impl IgnoreRuleSet {
    pub fn new(matchers: Vec<Gitignore>) -> Self {
        Self { matchers }
    }

    /// Number of ignore files contributing rules.
    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    /// Total number of patterns across all files.
    pub fn num_patterns(&self) -> u64 {
        self.matchers
            .iter()
            .map(|m| m.num_ignores() + m.num_whitelists())
            .sum()
    }

    /// Directories whose ignore files contributed matchers, in precedence order.
    pub fn sources(&self) -> impl Iterator<Item = &Path> {
        self.matchers.iter().map(|m| m.path())
    }

    /// Whether `path` (absolute) is excluded.
    ///
    /// The path counts as a file. A pattern excluding one of its parent
    /// directories excludes it too, whatever later `!` lines say about the
    /// file itself.
    pub fn matches(&self, path: &Path) -> bool {
        is_ignored_by(&self.matchers, path, false)
    }
}

/// Whether `path` is excluded by `matchers`.
///
/// Ancestor directories are judged first, shallowest to deepest; once one of
/// them is excluded nothing below it can be re-included, as in git. Only
/// then is the path itself matched.
pub(crate) fn is_ignored_by(matchers: &[Gitignore], path: &Path, is_dir: bool) -> bool {
    let mut ancestors: Vec<&Path> = path.ancestors().skip(1).collect();
    ancestors.reverse();

    for dir in ancestors {
        if decide(matchers, dir, true) == Some(true) {
            return true;
        }
    }
    decide(matchers, path, is_dir).unwrap_or(false)
}

/// The verdict of the last matcher with an opinion on `path` alone.
fn decide(matchers: &[Gitignore], path: &Path, is_dir: bool) -> Option<bool> {
    for matcher in matchers.iter().rev() {
        let Ok(rel) = path.strip_prefix(matcher.path()) else {
            continue;
        };
        if rel.as_os_str().is_empty() {
            continue;
        }
        match matcher.matched(rel, is_dir) {
            Match::Ignore(_) => return Some(true),
            Match::Whitelist(_) => return Some(false),
            Match::None => {}
        }
    }
    None
}
