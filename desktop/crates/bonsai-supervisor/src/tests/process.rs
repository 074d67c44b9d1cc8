use crate::tests::{FAKE_PID_BASE, RecordingControl};
use crate::{
    BinaryLocator, LaunchSpec, ProcessHandle, ProcessRole, ProcessState, SupervisorError,
    executable_name, is_process_running,
};

use std::time::Duration;

use googletest::assert_that;
use googletest::prelude::{anything, contains_substring, err};

// =========================================================================
// State transitions
// =========================================================================

#[test]
fn given_running_handle_when_transition_to_terminated_then_accepted() {
    let mut handle = ProcessHandle::adopt(FAKE_PID_BASE, "/opt/bonsai/server", ProcessRole::Server);

    assert!(handle.transition(ProcessState::Terminated));
    assert_eq!(handle.state(), ProcessState::Terminated);
}

#[test]
fn given_terminated_handle_when_transition_to_running_then_rejected() {
    // Given
    let mut handle = ProcessHandle::adopt(FAKE_PID_BASE, "/opt/bonsai/server", ProcessRole::Server);
    handle.transition(ProcessState::Terminated);

    // When
    let moved = handle.transition(ProcessState::Running);

    // Then
    assert!(!moved);
    assert_eq!(handle.state(), ProcessState::Terminated);
}

#[test]
fn given_unknown_handle_when_transition_then_only_forward_moves_apply() {
    let mut handle = ProcessHandle::adopt(FAKE_PID_BASE, "/opt/bonsai/daemon", ProcessRole::Daemon);

    assert!(handle.transition(ProcessState::Unknown));
    assert!(!handle.transition(ProcessState::Running));
    assert!(handle.transition(ProcessState::Terminated));
    assert!(!handle.transition(ProcessState::Unknown));
}

#[test]
fn given_terminated_handle_when_is_alive_then_false_without_probing() {
    let mut handle = ProcessHandle::adopt(std::process::id(), "/proc/self", ProcessRole::Server);
    handle.transition(ProcessState::Terminated);

    assert!(!handle.is_alive());
}

#[test]
fn given_adopted_handle_for_missing_pid_when_is_alive_then_marked_terminated() {
    let mut handle = ProcessHandle::adopt(FAKE_PID_BASE, "/opt/bonsai/server", ProcessRole::Server);

    assert!(!handle.is_alive());
    assert_eq!(handle.state(), ProcessState::Terminated);
}

// =========================================================================
// Identity
// =========================================================================

#[test]
fn test_daemon_tears_down_before_server() {
    assert!(ProcessRole::Daemon.teardown_rank() < ProcessRole::Server.teardown_rank());
}

#[test]
fn test_label_is_file_stem() {
    let spec = LaunchSpec::new(ProcessRole::Server, "/opt/bonsai/bonsai_dca_server.exe");
    assert_eq!(spec.label(), "bonsai_dca_server");

    let handle = ProcessHandle::adopt(7, "/opt/bonsai/bonsai_dca_daemon", ProcessRole::Daemon);
    assert_eq!(handle.label(), "bonsai_dca_daemon");
    assert_eq!(handle.role(), ProcessRole::Daemon);
    assert_eq!(
        handle.executable_path(),
        std::path::Path::new("/opt/bonsai/bonsai_dca_daemon")
    );
}

#[test]
fn test_launch_spec_with_args() {
    let spec = LaunchSpec::new(ProcessRole::Daemon, "daemon").with_args(["--port", "61712"]);
    assert_eq!(spec.args, vec!["--port".to_string(), "61712".to_string()]);
}

#[test]
fn test_executable_name_adds_platform_suffix_once() {
    let name = executable_name("bonsai_dca_server");
    assert_eq!(name, format!("bonsai_dca_server{}", std::env::consts::EXE_SUFFIX));
    assert_eq!(executable_name(&name), name);
}

// =========================================================================
// Binary resolution
// =========================================================================

#[test]
fn given_binary_in_second_dir_when_resolve_then_found_there() {
    // Given
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    let expected = second.path().join(executable_name("bonsai_dca_server"));
    std::fs::write(&expected, b"").unwrap();

    let locator = BinaryLocator::new()
        .with_dir(first.path())
        .with_dir(second.path());

    // When
    let resolved = locator.resolve("bonsai_dca_server");

    // Then
    assert_eq!(resolved, expected);
}

#[test]
fn given_binary_nowhere_when_resolve_then_first_candidate_returned() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    let locator = BinaryLocator::new()
        .with_dir(first.path())
        .with_dir(second.path());

    let resolved = locator.resolve("bonsai_dca_daemon");

    assert_eq!(
        resolved,
        first.path().join(executable_name("bonsai_dca_daemon"))
    );
}

#[test]
fn test_standard_locator_searches_configured_dir_first() {
    let configured = tempfile::tempdir().unwrap();
    let locator = BinaryLocator::standard(Some(configured.path()), None);

    assert_eq!(locator.search_dirs()[0], configured.path());
    assert!(locator.search_dirs().len() >= 2);
}

// =========================================================================
// Spawning
// =========================================================================

#[tokio::test]
async fn given_missing_executable_when_spawn_then_binary_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let spec = LaunchSpec::new(ProcessRole::Server, dir.path().join("nope"));

    let result = ProcessHandle::spawn(&spec);

    assert!(matches!(result, Err(SupervisorError::BinaryNotFound { .. })));
}

#[tokio::test]
async fn given_directory_when_spawn_then_not_executable() {
    let dir = tempfile::tempdir().unwrap();
    let spec = LaunchSpec::new(ProcessRole::Server, dir.path());

    let result = ProcessHandle::spawn(&spec);

    assert_that!(result, err(anything()));
    assert!(matches!(result, Err(SupervisorError::NotExecutable { .. })));
}

#[cfg(unix)]
#[tokio::test]
async fn given_file_without_exec_bit_when_spawn_then_not_executable() {
    // Given
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bonsai_dca_server");
    std::fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();

    // When
    let result = ProcessHandle::spawn(&LaunchSpec::new(ProcessRole::Server, &path));

    // Then
    let message = format!("{}", result.unwrap_err());
    assert_that!(message, contains_substring("not executable"));
}

#[cfg(unix)]
#[tokio::test]
async fn given_script_that_exits_when_polled_then_observed_terminated() {
    // Given
    let dir = tempfile::tempdir().unwrap();
    let path = crate::tests::write_script(dir.path(), "bonsai_dca_daemon", "exit 0");
    let mut handle = ProcessHandle::spawn(&LaunchSpec::new(ProcessRole::Daemon, &path)).unwrap();
    assert_eq!(handle.state(), ProcessState::Running);
    assert_eq!(handle.label(), "bonsai_dca_daemon");

    // When
    let exited = handle
        .confirm_exit(Duration::from_secs(5), &RecordingControl::default())
        .await;

    // Then
    assert!(exited);
    assert_eq!(handle.state(), ProcessState::Terminated);
    assert!(!handle.is_alive());
}

#[tokio::test]
async fn given_adopted_process_still_running_when_confirm_exit_then_false_after_grace() {
    // Given
    let control = RecordingControl::default();
    control.mark_stubborn(FAKE_PID_BASE);
    let mut handle = ProcessHandle::adopt(FAKE_PID_BASE, "server", ProcessRole::Server);

    // When
    let exited = handle
        .confirm_exit(Duration::from_millis(120), &control)
        .await;

    // Then
    assert!(!exited);
    assert_eq!(handle.state(), ProcessState::Running);
}

#[cfg(windows)]
#[test]
fn test_children_spawn_hidden_in_own_process_group() {
    use crate::process::CHILD_CREATION_FLAGS;
    use windows_sys::Win32::System::Threading::{CREATE_NEW_PROCESS_GROUP, CREATE_NO_WINDOW};

    assert_ne!(CHILD_CREATION_FLAGS & CREATE_NO_WINDOW, 0);
    assert_ne!(CHILD_CREATION_FLAGS & CREATE_NEW_PROCESS_GROUP, 0);
}

// =========================================================================
// PID probe
// =========================================================================

#[test]
fn test_current_process_is_running() {
    assert!(is_process_running(std::process::id()));
}

#[test]
fn test_missing_pid_is_not_running() {
    assert!(!is_process_running(FAKE_PID_BASE));
    assert!(!is_process_running(0));
}
