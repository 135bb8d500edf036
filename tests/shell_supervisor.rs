// tests/shell_supervisor.rs
//
// These spawn real `sh` processes.

use std::time::Duration;

use remon::errors::RemonError;
use remon::exec::{ExitInfo, ProcessState, ProcessSupervisor, ShellSupervisor};
use remon_test_utils::{init_tracing, with_timeout};

#[tokio::test]
async fn successful_command_reports_exit_zero() {
    init_tracing();
    let mut sup = ShellSupervisor::new();

    let mut proc = sup.start("true").expect("sh should start");
    let exit = with_timeout(proc.wait()).await;

    assert_eq!(exit, Some(ExitInfo::exited(0)));
    assert_eq!(proc.state(), ProcessState::Completed { code: 0 });
    assert_eq!(proc.command_line(), "true");
}

#[tokio::test]
async fn failing_command_reports_its_exit_code() {
    init_tracing();
    let mut sup = ShellSupervisor::new();

    let mut proc = sup.start("exit 3").unwrap();
    let exit = with_timeout(proc.wait()).await;

    assert_eq!(exit, Some(ExitInfo::exited(3)));
    assert!(!exit.unwrap().success());
}

#[tokio::test]
async fn command_line_goes_through_the_shell() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.txt");
    let mut sup = ShellSupervisor::new();

    let line = format!("echo one two > '{}' && test -s '{}'", out.display(), out.display());
    let mut proc = sup.start(&line).unwrap();

    assert_eq!(with_timeout(proc.wait()).await, Some(ExitInfo::exited(0)));
    assert_eq!(std::fs::read_to_string(&out).unwrap(), "one two\n");
}

#[tokio::test]
async fn kill_terminates_a_running_command() {
    init_tracing();
    let mut sup = ShellSupervisor::new();

    let mut proc = sup.start("sleep 30").unwrap();
    assert_eq!(proc.state(), ProcessState::Running);
    assert!(proc.pgid() > 0);

    sup.kill(&mut proc).unwrap();
    let exit = with_timeout(proc.wait()).await;

    assert_eq!(exit, Some(ExitInfo::signaled(9)));
    assert_eq!(proc.state(), ProcessState::Terminated);
}

#[tokio::test]
async fn kill_reaches_background_children_in_the_group() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("late.txt");
    let mut sup = ShellSupervisor::new();

    // The subshell would write the marker after a second unless the whole
    // group dies with the parent.
    let line = format!("(sleep 1; touch '{}') & wait", marker.display());
    let mut proc = sup.start(&line).unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    sup.kill(&mut proc).unwrap();
    with_timeout(proc.wait()).await;
    tokio::time::sleep(Duration::from_millis(1500)).await;

    assert!(!marker.exists(), "background child survived the group kill");
}

#[tokio::test]
async fn group_outliving_its_leader_is_still_killed() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("orphan.txt");
    let mut sup = ShellSupervisor::new();

    // The shell exits at once and leaves the subshell behind in its group.
    let line = format!("(sleep 1; touch '{}') &", marker.display());
    let mut proc = sup.start(&line).unwrap();

    assert_eq!(with_timeout(proc.wait()).await, Some(ExitInfo::exited(0)));
    assert!(!proc.group_gone());

    sup.kill(&mut proc).unwrap();
    tokio::time::sleep(Duration::from_millis(1500)).await;

    assert!(!marker.exists(), "orphaned group member survived the kill");
}

#[tokio::test]
async fn killing_a_finished_command_is_not_an_error() {
    init_tracing();
    let mut sup = ShellSupervisor::new();

    let mut proc = sup.start("true").unwrap();
    with_timeout(proc.wait()).await;
    assert!(proc.group_gone());

    sup.kill(&mut proc).unwrap();
    sup.kill(&mut proc).unwrap();

    // The exit was a normal one even though a kill was requested afterwards.
    assert_eq!(proc.state(), ProcessState::Completed { code: 0 });
}

#[tokio::test]
async fn missing_shell_is_a_spawn_error() {
    init_tracing();
    let mut sup = ShellSupervisor::with_shell("/definitely/not/a/shell");

    match sup.start("true") {
        Err(RemonError::Spawn { command, .. }) => assert_eq!(command, "true"),
        other => panic!("Expected Spawn error, got: {:?}", other),
    }
}
