// tests/reactor_fake_supervisor.rs

use std::path::Path;
use std::sync::Arc;

use tokio::sync::mpsc;

use remon::config::ReactorConfig;
use remon::engine::{ExitReason, Flow, Reactor, ReactorEvent};
use remon::exec::ProcessState;
use remon::filter::IgnoreLoader;
use remon::fs::mock::MockFileSystem;
use remon_test_utils::builders::{added, batch, changed, deleted, ConfigBuilder};
use remon_test_utils::fake_supervisor::{FakeSupervisor, SupervisorCall};
use remon_test_utils::{init_tracing, with_timeout};

struct Harness {
    reactor: Reactor<FakeSupervisor>,
    supervisor: FakeSupervisor,
    tx: mpsc::Sender<ReactorEvent>,
}

fn harness(cfg: &ReactorConfig, fs: Option<&MockFileSystem>) -> Harness {
    init_tracing();

    let supervisor = FakeSupervisor::new();
    let loader = fs.map(|fs| IgnoreLoader::from_config(cfg, Arc::new(fs.clone())));
    let (tx, rx) = mpsc::channel(16);
    let reactor = Reactor::new(cfg, loader, supervisor.clone(), rx);

    Harness {
        reactor,
        supervisor,
        tx,
    }
}

fn start(command: &str, pgid: i32) -> SupervisorCall {
    SupervisorCall::Start {
        command: command.to_string(),
        pgid,
    }
}

fn kill(pgid: i32) -> SupervisorCall {
    SupervisorCall::Kill { pgid }
}

#[test]
fn first_batch_starts_command_and_sentinel_stops_it() {
    let cfg = ConfigBuilder::new("echo hi", "/proj").no_ignore().build();
    let mut h = harness(&cfg, None);

    assert_eq!(
        h.reactor.handle_event(ReactorEvent::Changes(changed(&["a.txt"]))),
        Flow::Continue
    );
    assert_eq!(h.supervisor.calls(), vec![start("echo hi", 1000)]);
    assert_eq!(h.reactor.current().map(|p| p.pgid()), Some(1000));

    assert_eq!(
        h.reactor.handle_event(ReactorEvent::MonitorClosed),
        Flow::Exit(ExitReason::MonitorClosed)
    );
    assert_eq!(
        h.supervisor.calls(),
        vec![start("echo hi", 1000), kill(1000)]
    );
    assert!(h.reactor.current().is_none());
}

#[test]
fn retrigger_kills_previous_group_before_starting_next() {
    let cfg = ConfigBuilder::new("make", "/proj").no_ignore().build();
    let mut h = harness(&cfg, None);

    for name in ["a.c", "b.c", "c.c"] {
        h.reactor.handle_event(ReactorEvent::Changes(changed(&[name])));
    }

    assert_eq!(
        h.supervisor.calls(),
        vec![
            start("make", 1000),
            kill(1000),
            start("make", 1001),
            kill(1001),
            start("make", 1002),
        ]
    );
    assert_eq!(h.supervisor.max_live(), 1);
    assert_eq!(h.supervisor.live_count(), 1);
}

#[test]
fn fully_ignored_batch_leaves_running_command_alone() {
    let fs = MockFileSystem::new();
    fs.add_file("/proj/.gitignore", "build/*\n");
    let cfg = ConfigBuilder::new("make", "/proj").build();
    let mut h = harness(&cfg, Some(&fs));

    h.reactor.handle_event(ReactorEvent::Changes(changed(&["src/main.c"])));
    h.reactor.handle_event(ReactorEvent::Changes(added(&["build/out.o"])));

    assert_eq!(h.supervisor.calls(), vec![start("make", 1000)]);
    let current = h.reactor.current().expect("first command still tracked");
    assert_eq!(current.pgid(), 1000);
    assert_eq!(current.state(), ProcessState::Running);
}

#[test]
fn ignored_batch_with_nothing_running_starts_nothing() {
    let fs = MockFileSystem::new();
    fs.add_file("/proj/.gitignore", "build/*\n");
    let cfg = ConfigBuilder::new("make", "/proj").build();
    let mut h = harness(&cfg, Some(&fs));

    h.reactor.handle_event(ReactorEvent::Changes(added(&["build/out.o"])));

    assert!(h.supervisor.calls().is_empty());
    assert!(h.reactor.current().is_none());
}

#[test]
fn partially_ignored_batch_still_triggers() {
    let fs = MockFileSystem::new();
    fs.add_file("/proj/.gitignore", "*.log\n");
    let cfg = ConfigBuilder::new("make", "/proj").build();
    let mut h = harness(&cfg, Some(&fs));

    h.reactor
        .handle_event(ReactorEvent::Changes(changed(&["trace.log", "src/lib.rs"])));

    assert_eq!(h.supervisor.started(), vec![1000]);
}

#[test]
fn ignored_deletions_do_not_trigger() {
    let fs = MockFileSystem::new();
    fs.add_file("/proj/.gitignore", "*.tmp\n");
    let cfg = ConfigBuilder::new("make", "/proj").build();
    let mut h = harness(&cfg, Some(&fs));

    h.reactor.handle_event(ReactorEvent::Changes(deleted(&["scratch.tmp"])));

    assert!(h.supervisor.calls().is_empty());
}

#[test]
fn ignore_file_change_reloads_rules_for_the_same_batch() {
    let fs = MockFileSystem::new();
    fs.add_file("/proj/.gitignore", "build/\n");
    let cfg = ConfigBuilder::new("make", "/proj").build();
    let mut h = harness(&cfg, Some(&fs));

    // Under the stale rules `gen/x.rs` would trigger a run.
    fs.add_file("/proj/.gitignore", "gen/\n.gitignore\n");
    h.reactor
        .handle_event(ReactorEvent::Changes(changed(&[".gitignore", "gen/x.rs"])));

    assert!(h.supervisor.calls().is_empty());

    let rules = h.reactor.rules().expect("rules loaded");
    assert!(rules.matches(Path::new("/proj/gen/y.rs")));
    assert!(!rules.matches(Path::new("/proj/build/out.o")));
}

#[test]
fn nested_ignore_file_change_also_reloads() {
    let fs = MockFileSystem::new();
    fs.add_file("/proj/.gitignore", "");
    fs.add_file("/proj/web/.gitignore", "");
    let cfg = ConfigBuilder::new("make", "/proj").build();
    let mut h = harness(&cfg, Some(&fs));

    fs.add_file("/proj/web/.gitignore", "dist/\n");
    h.reactor
        .handle_event(ReactorEvent::Changes(changed(&["web/.gitignore"])));
    assert_eq!(h.supervisor.started(), vec![1000]);

    h.reactor
        .handle_event(ReactorEvent::Changes(added(&["web/dist/app.js"])));
    assert_eq!(h.supervisor.started(), vec![1000]);
}

#[test]
fn failed_reload_keeps_previous_rules() {
    let fs = MockFileSystem::new();
    fs.add_file("/proj/.gitignore", "build/\n");
    let cfg = ConfigBuilder::new("make", "/proj").build();
    let mut h = harness(&cfg, Some(&fs));

    fs.make_unreadable("/proj");
    h.reactor
        .handle_event(ReactorEvent::Changes(changed(&[".gitignore"])));
    assert_eq!(h.supervisor.started(), vec![1000]);

    let rules = h.reactor.rules().expect("previous rules kept");
    assert!(rules.matches(Path::new("/proj/build/a.o")));

    h.reactor
        .handle_event(ReactorEvent::Changes(added(&["build/b.o"])));
    assert_eq!(h.supervisor.started(), vec![1000]);
}

#[test]
fn unreadable_root_at_startup_means_no_filtering() {
    let fs = MockFileSystem::new();
    let cfg = ConfigBuilder::new("make", "/missing").build();
    let mut h = harness(&cfg, Some(&fs));

    assert!(h.reactor.rules().is_none());

    h.reactor
        .handle_event(ReactorEvent::Changes(added(&["build/out.o"])));
    assert_eq!(h.supervisor.started(), vec![1000]);
}

#[test]
fn spawn_failure_is_survived_and_next_batch_retries() {
    let cfg = ConfigBuilder::new("missing-tool", "/proj").no_ignore().build();
    let mut h = harness(&cfg, None);

    h.supervisor.fail_starts(true);
    assert_eq!(
        h.reactor.handle_event(ReactorEvent::Changes(changed(&["a"]))),
        Flow::Continue
    );
    assert!(h.reactor.current().is_none());

    h.supervisor.fail_starts(false);
    h.reactor.handle_event(ReactorEvent::Changes(changed(&["a"])));

    assert_eq!(
        h.supervisor.calls(),
        vec![
            SupervisorCall::StartFailed {
                command: "missing-tool".to_string()
            },
            start("missing-tool", 1000),
        ]
    );
}

#[test]
fn kill_failure_does_not_stop_the_restart() {
    let cfg = ConfigBuilder::new("make", "/proj").no_ignore().build();
    let mut h = harness(&cfg, None);

    h.reactor.handle_event(ReactorEvent::Changes(changed(&["a"])));
    h.supervisor.fail_kills(true);
    h.reactor.handle_event(ReactorEvent::Changes(changed(&["b"])));

    assert_eq!(
        h.supervisor.calls(),
        vec![start("make", 1000), kill(1000), start("make", 1001)]
    );
    assert_eq!(h.reactor.current().map(|p| p.pgid()), Some(1001));
}

#[test]
fn naturally_completed_process_is_still_killed_before_restart() {
    let cfg = ConfigBuilder::new("make", "/proj").no_ignore().build();
    let mut h = harness(&cfg, None);

    h.reactor.handle_event(ReactorEvent::Changes(changed(&["a"])));
    h.supervisor.complete(1000, 0);
    assert_eq!(
        h.reactor.current().map(|p| p.state()),
        Some(ProcessState::Completed { code: 0 })
    );

    h.reactor.handle_event(ReactorEvent::Changes(changed(&["b"])));

    assert_eq!(
        h.supervisor.calls(),
        vec![start("make", 1000), kill(1000), start("make", 1001)]
    );
}

#[test]
fn interrupt_kills_running_group_then_exits() {
    let cfg = ConfigBuilder::new("serve", "/proj").no_ignore().build();
    let mut h = harness(&cfg, None);

    h.reactor.handle_event(ReactorEvent::Changes(changed(&["a"])));

    assert_eq!(
        h.reactor.handle_event(ReactorEvent::Interrupt),
        Flow::Exit(ExitReason::Interrupted)
    );
    assert_eq!(h.supervisor.calls().last(), Some(&kill(1000)));
    assert_eq!(h.supervisor.live_count(), 0);
}

#[test]
fn interrupt_while_idle_exits_without_calls() {
    let cfg = ConfigBuilder::new("serve", "/proj").no_ignore().build();
    let mut h = harness(&cfg, None);

    assert_eq!(
        h.reactor.handle_event(ReactorEvent::Interrupt),
        Flow::Exit(ExitReason::Interrupted)
    );
    assert!(h.supervisor.calls().is_empty());
}

#[test]
fn empty_batch_is_skipped() {
    let cfg = ConfigBuilder::new("make", "/proj").no_ignore().build();
    let mut h = harness(&cfg, None);

    h.reactor.handle_event(ReactorEvent::Changes(batch(&[], &[], &[])));

    assert!(h.supervisor.calls().is_empty());
}

#[tokio::test]
async fn run_consumes_events_in_order_until_monitor_closes() {
    let cfg = ConfigBuilder::new("echo hi", "/proj").no_ignore().build();
    let mut h = harness(&cfg, None);

    h.tx.send(ReactorEvent::Changes(changed(&["a.txt"]))).await.unwrap();
    h.tx.send(ReactorEvent::Changes(added(&["b.txt"]))).await.unwrap();
    h.tx.send(ReactorEvent::MonitorClosed).await.unwrap();

    let reason = with_timeout(h.reactor.run()).await;

    assert_eq!(reason, ExitReason::MonitorClosed);
    assert_eq!(
        h.supervisor.calls(),
        vec![
            start("echo hi", 1000),
            kill(1000),
            start("echo hi", 1001),
            kill(1001),
        ]
    );
}

#[tokio::test]
async fn run_on_start_triggers_before_first_batch() {
    let cfg = ConfigBuilder::new("make", "/proj")
        .no_ignore()
        .run_on_start(true)
        .build();
    let mut h = harness(&cfg, None);

    h.tx.send(ReactorEvent::Interrupt).await.unwrap();

    let reason = with_timeout(h.reactor.run()).await;

    assert_eq!(reason, ExitReason::Interrupted);
    assert_eq!(h.supervisor.calls(), vec![start("make", 1000), kill(1000)]);
}

#[tokio::test]
async fn closed_channel_is_treated_as_monitor_shutdown() {
    let cfg = ConfigBuilder::new("make", "/proj").no_ignore().build();
    let Harness {
        mut reactor,
        supervisor,
        tx,
    } = harness(&cfg, None);

    tx.send(ReactorEvent::Changes(changed(&["a"]))).await.unwrap();
    drop(tx);

    let reason = with_timeout(reactor.run()).await;

    assert_eq!(reason, ExitReason::MonitorClosed);
    assert_eq!(supervisor.kills(), vec![1000]);
}

#[tokio::test]
async fn interrupt_overtakes_queued_batches() {
    init_tracing();
    let cfg = ConfigBuilder::new("make", "/proj")
        .no_ignore()
        .run_on_start(true)
        .build();
    let supervisor = FakeSupervisor::new();
    let (tx, rx) = mpsc::channel(16);
    let (interrupt_tx, interrupt_rx) = mpsc::channel(1);
    let mut reactor =
        Reactor::new(&cfg, None, supervisor.clone(), rx).with_interrupts(interrupt_rx);

    for name in ["a.rs", "b.rs", "c.rs"] {
        tx.send(ReactorEvent::Changes(changed(&[name]))).await.unwrap();
    }
    interrupt_tx.send(ReactorEvent::Interrupt).await.unwrap();

    let reason = with_timeout(reactor.run()).await;

    assert_eq!(reason, ExitReason::Interrupted);
    assert_eq!(supervisor.calls(), vec![start("make", 1000), kill(1000)]);
}

#[tokio::test]
async fn closed_interrupt_channel_does_not_stop_the_loop() {
    let cfg = ConfigBuilder::new("make", "/proj").no_ignore().build();
    let supervisor = FakeSupervisor::new();
    let (tx, rx) = mpsc::channel(16);
    let (interrupt_tx, interrupt_rx) = mpsc::channel::<ReactorEvent>(1);
    drop(interrupt_tx);
    let mut reactor =
        Reactor::new(&cfg, None, supervisor.clone(), rx).with_interrupts(interrupt_rx);

    tx.send(ReactorEvent::Changes(changed(&["a.rs"]))).await.unwrap();
    tx.send(ReactorEvent::MonitorClosed).await.unwrap();

    let reason = with_timeout(reactor.run()).await;

    assert_eq!(reason, ExitReason::MonitorClosed);
    assert_eq!(supervisor.calls(), vec![start("make", 1000), kill(1000)]);
}
