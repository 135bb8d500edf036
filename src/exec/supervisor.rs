// src/exec/supervisor.rs

//! Production supervisor: every command runs as `sh -c <line>` in its own
//! process group so the group can be killed together with anything the
//! command spawned.

use std::process::Stdio;
use std::sync::atomic::Ordering;
use std::time::Instant;

use nix::errno::Errno;
use nix::sys::signal::{killpg, Signal};
use nix::unistd::Pid;
use tokio::process::Command;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::errors::{RemonError, Result};
use crate::exec::backend::ProcessSupervisor;
use crate::exec::process::{ExitInfo, SupervisedProcess};
use crate::exec::report::report_completion;

const DEFAULT_SHELL: &str = "sh";

#[derive(Debug, Clone)]
pub struct ShellSupervisor {
    shell: String,
}

impl Default for ShellSupervisor {
    fn default() -> Self {
        Self::new()
    }
}

impl ShellSupervisor {
    pub fn new() -> Self {
        Self::with_shell(DEFAULT_SHELL)
    }

    /// Use a different shell binary. It must accept `-c <command>`.
    pub fn with_shell(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }
}

impl ProcessSupervisor for ShellSupervisor {
    /// Must be called from within a Tokio runtime; the completion watcher is
    /// a spawned task.
    fn start(&mut self, command_line: &str) -> Result<SupervisedProcess> {
        let spawn_error = |source: std::io::Error| RemonError::Spawn {
            command: command_line.to_string(),
            source,
        };

        let mut cmd = Command::new(&self.shell);
        cmd.arg("-c")
            .arg(command_line)
            // A background process group reading the terminal would be stopped.
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .process_group(0)
            .kill_on_drop(false);

        let mut child = cmd.spawn().map_err(spawn_error)?;
        let started_at = Instant::now();

        let pid = child
            .id()
            .ok_or_else(|| spawn_error(std::io::Error::other("process exited before it was tracked")))?;
        let pgid = i32::try_from(pid)
            .map_err(|_| spawn_error(std::io::Error::other(format!("pid {pid} out of range"))))?;

        info!(command = %command_line, pgid, "command started");

        let (exit_tx, exit_rx) = watch::channel(None);
        let process = SupervisedProcess::new(command_line, pgid, started_at, exit_rx);
        let group_gone = process.group_gone_flag();
        let command = command_line.to_string();

        // Completion watcher: runs independently of the reactor.
        tokio::spawn(async move {
            let exit = match child.wait().await {
                Ok(status) => ExitInfo::from_status(status),
                Err(err) => {
                    warn!(pgid, error = %err, "failed to wait for command");
                    ExitInfo::exited(-1)
                }
            };
            // Check right after reaping the leader, before its pid can be
            // handed out again.
            if group_is_empty(pgid) {
                group_gone.store(true, Ordering::Release);
            } else {
                debug!(pgid, "leader exited; group still has members");
            }
            report_completion(&command, pgid, exit, started_at.elapsed());
            let _ = exit_tx.send(Some(exit));
        });

        Ok(process)
    }

    fn kill(&mut self, process: &mut SupervisedProcess) -> Result<()> {
        let pgid = process.pgid();
        process.mark_kill_requested();

        if process.group_gone() {
            debug!(pgid, "process group already empty; not signalling");
            return Ok(());
        }

        // The leader may be gone while children it left in the group are
        // not, so a group that was not seen empty is signalled even after
        // an observed exit. Its id cannot be reused while members remain.
        match killpg(Pid::from_raw(pgid), Signal::SIGKILL) {
            Ok(()) => {
                info!(pgid, "sent SIGKILL to process group");
                Ok(())
            }
            Err(Errno::ESRCH) => {
                debug!(pgid, "process group already gone");
                process.mark_group_gone();
                Ok(())
            }
            Err(source) => Err(RemonError::Kill { pgid, source }),
        }
    }
}

/// Signal 0 to the group: `ESRCH` means no member is left.
fn group_is_empty(pgid: i32) -> bool {
    matches!(killpg(Pid::from_raw(pgid), None::<Signal>), Err(Errno::ESRCH))
}
