// src/engine/reactor.rs

use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::config::ReactorConfig;
use crate::engine::core::{filter_batch, touches_ignore_file, BatchDecision};
use crate::engine::summary::summarize;
use crate::engine::{ExitReason, Flow, ReactorEvent};
use crate::exec::{ProcessSupervisor, SupervisedProcess};
use crate::filter::{IgnoreLoader, IgnoreRuleSet};
use crate::watch::ChangeBatch;

/// The central control loop.
///
/// Owns, and is the only mutator of, the current ignore rules and the one
/// tracked process. Events are handled strictly one at a time, so a new
/// command is only ever started after the previous one was told to die.
pub struct Reactor<S: ProcessSupervisor> {
    config: ReactorConfig,
    loader: Option<IgnoreLoader>,
    rules: Option<Arc<IgnoreRuleSet>>,
    supervisor: S,
    current: Option<SupervisedProcess>,
    events: mpsc::Receiver<ReactorEvent>,
    interrupts: Option<mpsc::Receiver<ReactorEvent>>,
}

impl<S: ProcessSupervisor> fmt::Debug for Reactor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reactor")
            .field("command", &self.config.command)
            .field("rules", &self.rules)
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

impl<S: ProcessSupervisor> Reactor<S> {
    /// Build a reactor and load the initial ignore rules.
    ///
    /// `loader` is `None` when ignore files are disabled. If it cannot read
    /// any root the reactor simply starts without filtering.
    pub fn new(
        config: &ReactorConfig,
        loader: Option<IgnoreLoader>,
        supervisor: S,
        events: mpsc::Receiver<ReactorEvent>,
    ) -> Self {
        let rules = loader.as_ref().and_then(IgnoreLoader::load).map(Arc::new);
        if loader.is_some() && rules.is_none() {
            warn!("starting without ignore rules");
        }

        Self {
            config: config.clone(),
            loader,
            rules,
            supervisor,
            current: None,
            events,
            interrupts: None,
        }
    }

    /// Read interrupts from their own channel. [`Reactor::run`] always
    /// drains it before looking at queued batches.
    pub fn with_interrupts(mut self, interrupts: mpsc::Receiver<ReactorEvent>) -> Self {
        self.interrupts = Some(interrupts);
        self
    }

    /// Rules used for the next filtering decision.
    pub fn rules(&self) -> Option<&IgnoreRuleSet> {
        self.rules.as_deref()
    }

    /// The tracked process, if one was started and not yet replaced.
    pub fn current(&self) -> Option<&SupervisedProcess> {
        self.current.as_ref()
    }

    /// Consume events until the monitor closes or an interrupt arrives.
    pub async fn run(&mut self) -> ExitReason {
        info!(
            root = ?self.config.watch_root,
            command = %self.config.command,
            "reactor started"
        );

        if self.config.run_on_start {
            self.restart();
        }

        loop {
            let event = tokio::select! {
                biased;
                Some(event) = next_interrupt(&mut self.interrupts) => event,
                event = self.events.recv() => match event {
                    Some(event) => event,
                    None => {
                        info!("event channel closed; treating as monitor shutdown");
                        ReactorEvent::MonitorClosed
                    }
                },
            };

            debug!(?event, "reactor received event");

            if let Flow::Exit(reason) = self.handle_event(event) {
                info!(?reason, "reactor exiting");
                return reason;
            }
        }
    }

    /// Handle a single event. Never fails: every error below is logged and
    /// the loop carries on.
    pub fn handle_event(&mut self, event: ReactorEvent) -> Flow {
        match event {
            ReactorEvent::Changes(batch) => {
                self.handle_batch(batch);
                Flow::Continue
            }
            ReactorEvent::MonitorClosed => {
                self.stop_current();
                Flow::Exit(ExitReason::MonitorClosed)
            }
            ReactorEvent::Interrupt => {
                self.stop_current();
                Flow::Exit(ExitReason::Interrupted)
            }
        }
    }

    fn handle_batch(&mut self, batch: ChangeBatch) {
        // Reload first so this very batch is judged by the new rules.
        if touches_ignore_file(&batch, &self.config) {
            self.reload_rules();
        }

        let relevant = match filter_batch(&batch, self.rules(), &self.config.watch_root) {
            BatchDecision::Skip { ignored } => {
                eprintln!("[remon] skipped: all {ignored} change(s) ignored");
                info!(ignored, "skipping batch; all changes ignored");
                return;
            }
            BatchDecision::Trigger(relevant) => relevant,
        };

        for line in summarize(&relevant) {
            eprintln!("{line}");
        }

        self.restart();
    }

    fn reload_rules(&mut self) {
        let Some(loader) = &self.loader else {
            return;
        };
        match loader.load() {
            Some(rules) => {
                info!(files = rules.len(), "ignore rules reloaded");
                self.rules = Some(Arc::new(rules));
            }
            None => {
                warn!("ignore rules could not be reloaded; keeping previous rules");
            }
        }
    }

    /// Kill whatever is tracked, then start the command afresh.
    fn restart(&mut self) {
        self.stop_current();

        eprintln!("[remon] running: {}", self.config.command);
        match self.supervisor.start(&self.config.command) {
            Ok(process) => {
                debug!(pgid = process.pgid(), "tracking new process");
                self.current = Some(process);
            }
            Err(err) => {
                eprintln!("[remon] ✗ {err}");
                error!(error = %err, "command not started; waiting for the next change");
            }
        }
    }

    fn stop_current(&mut self) {
        let Some(mut process) = self.current.take() else {
            return;
        };
        debug!(pgid = process.pgid(), ran_for = ?process.elapsed(), "stopping tracked command");
        if let Err(err) = self.supervisor.kill(&mut process) {
            warn!(pgid = process.pgid(), error = %err, "failed to kill previous command");
        }
    }
}

/// Pending forever when there is no interrupt channel.
async fn next_interrupt(rx: &mut Option<mpsc::Receiver<ReactorEvent>>) -> Option<ReactorEvent> {
    match rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}
