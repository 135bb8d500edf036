// src/exec/process.rs

use std::fmt;
use std::process::ExitStatus;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::watch;

/// How a supervised command ended.
///
/// `code` is the exit code, or the signal number when `signaled` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitInfo {
    pub code: i32,
    pub signaled: bool,
}

impl ExitInfo {
    pub fn exited(code: i32) -> Self {
        Self {
            code,
            signaled: false,
        }
    }

    pub fn signaled(signal: i32) -> Self {
        Self {
            code: signal,
            signaled: true,
        }
    }

    pub fn from_status(status: ExitStatus) -> Self {
        use std::os::unix::process::ExitStatusExt;

        match status.signal() {
            Some(signal) => Self::signaled(signal),
            None => Self::exited(status.code().unwrap_or(-1)),
        }
    }

    pub fn success(&self) -> bool {
        !self.signaled && self.code == 0
    }
}

/// Lifecycle of a supervised command as seen by its owner.
///
/// A kill request can race the command's own exit; whichever the OS reports
/// decides between `Completed`/`Signaled` and `Terminated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    Running,
    KillRequested,
    Completed { code: i32 },
    Signaled { signal: i32 },
    /// Ended by a signal after we asked for it.
    Terminated,
}

/// Handle to one started command and its process group.
///
/// Exit information arrives on a watch channel fed by the completion
/// watcher; the handle never blocks to learn it.
///
/// Once the group is known to be empty it stays empty: its id may since
/// belong to an unrelated group, so it must not be signalled again.
pub struct SupervisedProcess {
    command_line: String,
    pgid: i32,
    started_at: Instant,
    kill_requested: bool,
    group_gone: Arc<AtomicBool>,
    exit: watch::Receiver<Option<ExitInfo>>,
}

impl fmt::Debug for SupervisedProcess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupervisedProcess")
            .field("command_line", &self.command_line)
            .field("pgid", &self.pgid)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl SupervisedProcess {
    pub fn new(
        command_line: impl Into<String>,
        pgid: i32,
        started_at: Instant,
        exit: watch::Receiver<Option<ExitInfo>>,
    ) -> Self {
        Self {
            command_line: command_line.into(),
            pgid,
            started_at,
            kill_requested: false,
            group_gone: Arc::new(AtomicBool::new(false)),
            exit,
        }
    }

    /// A handle whose exit is reported by whoever holds the returned sender.
    pub fn detached(
        command_line: impl Into<String>,
        pgid: i32,
    ) -> (Self, watch::Sender<Option<ExitInfo>>) {
        let (tx, rx) = watch::channel(None);
        (Self::new(command_line, pgid, Instant::now(), rx), tx)
    }

    pub fn command_line(&self) -> &str {
        &self.command_line
    }

    pub fn pgid(&self) -> i32 {
        self.pgid
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    pub fn exit_info(&self) -> Option<ExitInfo> {
        *self.exit.borrow()
    }

    pub fn mark_kill_requested(&mut self) {
        self.kill_requested = true;
    }

    /// Whether every member of the process group is known to have exited.
    pub fn group_gone(&self) -> bool {
        self.group_gone.load(Ordering::Acquire)
    }

    pub fn mark_group_gone(&self) {
        self.group_gone.store(true, Ordering::Release);
    }

    /// Shared flag for the completion watcher, which may learn first.
    pub(crate) fn group_gone_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.group_gone)
    }

    pub fn state(&self) -> ProcessState {
        match (self.exit_info(), self.kill_requested) {
            (None, false) => ProcessState::Running,
            (None, true) => ProcessState::KillRequested,
            (Some(exit), true) if exit.signaled => ProcessState::Terminated,
            (Some(exit), _) if exit.signaled => ProcessState::Signaled { signal: exit.code },
            (Some(exit), _) => ProcessState::Completed { code: exit.code },
        }
    }

    /// Wait until the completion watcher reports an exit.
    ///
    /// `None` if the watcher went away without reporting.
    pub async fn wait(&mut self) -> Option<ExitInfo> {
        match self.exit.wait_for(Option::is_some).await {
            Ok(exit) => *exit,
            Err(_) => None,
        }
    }
}
