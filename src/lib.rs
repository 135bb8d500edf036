// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod filter;
pub mod fs;
pub mod logging;
pub mod types;
pub mod watch;

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::info;

use crate::cli::CliArgs;
use crate::config::load_and_resolve;
use crate::engine::{spawn_interrupt_listener, ExitReason, Reactor, ReactorEvent};
use crate::errors::{RemonError, Result};
use crate::exec::ShellSupervisor;
use crate::filter::IgnoreLoader;
use crate::fs::RealFileSystem;
use crate::watch::{spawn_monitor, PatternSet};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config resolution (CLI + optional file)
/// - the change monitor
/// - the interrupt listener
/// - ignore rules, the shell supervisor and the reactor loop
pub async fn run(args: CliArgs) -> Result<ExitReason> {
    let cfg = load_and_resolve(&args)?;
    info!(
        root = ?cfg.watch_root,
        patterns = ?cfg.patterns,
        debounce = ?cfg.debounce,
        "configuration resolved"
    );

    let patterns = PatternSet::from_config(&cfg)?;

    let (tx, rx) = mpsc::channel::<ReactorEvent>(64);

    let _monitor = spawn_monitor(cfg.watch_root.clone(), patterns, cfg.debounce, tx)
        .map_err(|e| RemonError::Startup(format!("cannot watch {}: {e}", cfg.watch_root.display())))?;

    let (interrupt_tx, interrupt_rx) = mpsc::channel::<ReactorEvent>(1);
    spawn_interrupt_listener(interrupt_tx)
        .map_err(|e| RemonError::Startup(format!("cannot listen for interrupts: {e}")))?;

    let loader = cfg
        .use_ignore_files
        .then(|| IgnoreLoader::from_config(&cfg, Arc::new(RealFileSystem)));

    let mut reactor =
        Reactor::new(&cfg, loader, ShellSupervisor::new(), rx).with_interrupts(interrupt_rx);
    Ok(reactor.run().await)
}
