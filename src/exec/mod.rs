// src/exec/mod.rs

//! Process supervision.
//!
//! - [`process`] defines the [`SupervisedProcess`] handle and its states.
//! - [`backend`] provides the [`ProcessSupervisor`] trait the reactor talks
//!   to, so tests can swap in a fake that spawns nothing.
//! - [`supervisor`] is the production [`ShellSupervisor`]: `sh -c` in a
//!   fresh process group, killed as a unit with `SIGKILL`.
//! - [`report`] renders the completion lines an operator sees.

pub mod backend;
pub mod process;
pub mod report;
pub mod supervisor;

pub use backend::ProcessSupervisor;
pub use process::{ExitInfo, ProcessState, SupervisedProcess};
pub use supervisor::ShellSupervisor;
