// src/exec/report.rs

//! Human-facing completion lines.

use std::time::Duration;

use tracing::{info, warn};

use crate::exec::process::ExitInfo;

/// Render the status line for a finished command.
pub fn completion_line(exit: ExitInfo, elapsed: Duration) -> String {
    if exit.success() {
        format!("[remon] ✓ exited 0 after {elapsed:.2?}")
    } else if exit.signaled {
        format!("[remon] ✗ killed by signal {} after {elapsed:.2?}", exit.code)
    } else {
        format!("[remon] ✗ exited with code {} after {elapsed:.2?}", exit.code)
    }
}

/// Print the status line to stderr and log the outcome.
pub fn report_completion(command: &str, pgid: i32, exit: ExitInfo, elapsed: Duration) {
    eprintln!("{}", completion_line(exit, elapsed));

    if exit.success() {
        info!(command, pgid, ?elapsed, "command succeeded");
    } else {
        warn!(
            command,
            pgid,
            code = exit.code,
            signaled = exit.signaled,
            ?elapsed,
            "command failed"
        );
    }
}
