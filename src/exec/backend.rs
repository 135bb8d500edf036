// src/exec/backend.rs

//! Pluggable supervisor abstraction.
//!
//! The reactor owns a `ProcessSupervisor` instead of spawning processes
//! itself. Production uses [`super::ShellSupervisor`]; tests provide an
//! implementation that records calls and hands out detached handles.

use crate::errors::Result;
use crate::exec::process::SupervisedProcess;

pub trait ProcessSupervisor: Send {
    /// Start `command_line` and return as soon as it is running.
    ///
    /// Completion is observed in the background and published through the
    /// returned handle.
    fn start(&mut self, command_line: &str) -> Result<SupervisedProcess>;

    /// Forcefully terminate the whole process group behind `process`.
    ///
    /// Killing a handle that already exited, or was killed before, is not an
    /// error.
    fn kill(&mut self, process: &mut SupervisedProcess) -> Result<()>;
}
