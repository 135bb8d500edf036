// src/engine/mod.rs

//! The reactor: turns change batches into a disciplined sequence of
//! command runs.
//!
//! - [`core`] holds the pure decisions (does this batch reload ignore rules,
//!   what is left of it after filtering) and is tested without Tokio,
//!   processes or a filesystem.
//! - [`summary`] renders the bounded "what changed" listing.
//! - [`reactor`] is the loop owning the ignore rules and the one tracked
//!   process, driving a [`crate::exec::ProcessSupervisor`].
//! - [`signals`] turns operator interrupts into a [`ReactorEvent`].

use crate::watch::ChangeBatch;

/// Everything the reactor consumes, in arrival order, from one channel.
#[derive(Debug, Clone)]
pub enum ReactorEvent {
    /// One debounced batch from the change monitor.
    Changes(ChangeBatch),
    /// The change monitor shut down; no more batches will come.
    MonitorClosed,
    /// Operator interrupt: kill the running group and exit now.
    Interrupt,
}

/// Why the reactor loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    MonitorClosed,
    Interrupted,
}

/// What the loop does after handling one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit(ExitReason),
}

pub mod core;
pub mod reactor;
pub mod signals;
pub mod summary;

pub use self::core::{filter_batch, touches_ignore_file, BatchDecision};
pub use reactor::Reactor;
pub use signals::spawn_interrupt_listener;
pub use summary::{summarize, MAX_LISTED};
