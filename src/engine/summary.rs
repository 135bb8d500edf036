// src/engine/summary.rs

use std::path::PathBuf;

use crate::watch::ChangeBatch;

/// Most paths listed per section before collapsing into a count.
pub const MAX_LISTED: usize = 10;

/// Human-readable lines describing a batch.
///
/// Added and changed paths share one section, deletions get their own; each
/// section lists at most [`MAX_LISTED`] paths followed by an overflow line.
pub fn summarize(batch: &ChangeBatch) -> Vec<String> {
    let mut lines = Vec::new();

    let modified = batch.added.len() + batch.changed.len();
    if modified > 0 {
        lines.push(format!("[remon] {modified} {} changed:", files(modified)));
        let entries = batch
            .added
            .iter()
            .map(|p| ('+', p))
            .chain(batch.changed.iter().map(|p| ('~', p)));
        push_bounded(&mut lines, entries, modified);
    }

    if !batch.deleted.is_empty() {
        let deleted = batch.deleted.len();
        lines.push(format!("[remon] {deleted} {} deleted:", files(deleted)));
        push_bounded(&mut lines, batch.deleted.iter().map(|p| ('-', p)), deleted);
    }

    lines
}

fn push_bounded<'a>(
    lines: &mut Vec<String>,
    entries: impl Iterator<Item = (char, &'a PathBuf)>,
    total: usize,
) {
    for (marker, path) in entries.take(MAX_LISTED) {
        lines.push(format!("  {marker} {}", path.display()));
    }
    if total > MAX_LISTED {
        lines.push(format!("  ... and {} more", total - MAX_LISTED));
    }
}

fn files(n: usize) -> &'static str {
    if n == 1 { "file" } else { "files" }
}
