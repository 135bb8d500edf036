use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use nix::errno::Errno;
use tokio::sync::watch;

use remon::errors::{RemonError, Result};
use remon::exec::{ExitInfo, ProcessSupervisor, SupervisedProcess};

/// One call made by the reactor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupervisorCall {
    Start { command: String, pgid: i32 },
    StartFailed { command: String },
    Kill { pgid: i32 },
}

#[derive(Debug, Default)]
struct State {
    calls: Vec<SupervisorCall>,
    next_pgid: i32,
    live: HashSet<i32>,
    max_live: usize,
    exits: HashMap<i32, watch::Sender<Option<ExitInfo>>>,
    fail_starts: bool,
    fail_kills: bool,
}

/// A supervisor that spawns nothing.
///
/// - records every start / kill in order
/// - hands out detached handles with increasing fake pgids
/// - tracks how many "processes" are live (started, not killed, not
///   completed) and the maximum ever observed
///
/// Clones share state, so a test keeps one clone and gives the other to the
/// reactor.
#[derive(Debug, Clone)]
pub struct FakeSupervisor {
    state: Arc<Mutex<State>>,
}

impl Default for FakeSupervisor {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeSupervisor {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                next_pgid: 1000,
                ..State::default()
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn calls(&self) -> Vec<SupervisorCall> {
        self.lock().calls.clone()
    }

    /// Pgids of successfully started processes, in start order.
    pub fn started(&self) -> Vec<i32> {
        self.lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                SupervisorCall::Start { pgid, .. } => Some(*pgid),
                _ => None,
            })
            .collect()
    }

    pub fn kills(&self) -> Vec<i32> {
        self.lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                SupervisorCall::Kill { pgid } => Some(*pgid),
                _ => None,
            })
            .collect()
    }

    pub fn live_count(&self) -> usize {
        self.lock().live.len()
    }

    pub fn max_live(&self) -> usize {
        self.lock().max_live
    }

    pub fn fail_starts(&self, fail: bool) {
        self.lock().fail_starts = fail;
    }

    pub fn fail_kills(&self, fail: bool) {
        self.lock().fail_kills = fail;
    }

    /// Simulate the process exiting on its own.
    pub fn complete(&self, pgid: i32, code: i32) {
        let mut state = self.lock();
        state.live.remove(&pgid);
        if let Some(tx) = state.exits.get(&pgid) {
            let _ = tx.send(Some(ExitInfo::exited(code)));
        }
    }
}

impl ProcessSupervisor for FakeSupervisor {
    fn start(&mut self, command_line: &str) -> Result<SupervisedProcess> {
        let mut state = self.lock();

        if state.fail_starts {
            state.calls.push(SupervisorCall::StartFailed {
                command: command_line.to_string(),
            });
            return Err(RemonError::Spawn {
                command: command_line.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "sh: not found"),
            });
        }

        let pgid = state.next_pgid;
        state.next_pgid += 1;

        let (process, exit_tx) = SupervisedProcess::detached(command_line, pgid);
        state.exits.insert(pgid, exit_tx);
        state.calls.push(SupervisorCall::Start {
            command: command_line.to_string(),
            pgid,
        });
        state.live.insert(pgid);
        state.max_live = state.max_live.max(state.live.len());

        Ok(process)
    }

    fn kill(&mut self, process: &mut SupervisedProcess) -> Result<()> {
        let pgid = process.pgid();
        let mut state = self.lock();

        state.calls.push(SupervisorCall::Kill { pgid });
        process.mark_kill_requested();

        if state.fail_kills {
            return Err(RemonError::Kill {
                pgid,
                source: Errno::EPERM,
            });
        }

        if state.live.remove(&pgid) {
            if let Some(tx) = state.exits.get(&pgid) {
                let _ = tx.send(Some(ExitInfo::signaled(9)));
            }
        }
        Ok(())
    }
}
