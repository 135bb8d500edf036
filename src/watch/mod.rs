// src/watch/mod.rs

//! The change monitor feeding the reactor.
//!
//! This module is responsible for:
//! - Compiling include / exclude glob patterns (`patterns`).
//! - Wiring up a cross-platform filesystem watcher (`notify`) and coalescing
//!   its raw events into one [`ChangeBatch`] per debounce window (`monitor`,
//!   `batch`).
//!
//! It knows nothing about ignore files or processes; the reactor only sees
//! the batches it emits and a final `MonitorClosed`.

pub mod batch;
pub mod monitor;
pub mod path_utils;
pub mod patterns;

pub use batch::{BatchBuilder, ChangeBatch, ChangeKind};
pub use monitor::{spawn_monitor, MonitorHandle};
pub use patterns::PatternSet;
