mod process;

use crate::{
    EscalationStep, LaunchSpec, LauncherConfig, ProcessControl, ProcessHandle, ProcessLauncher,
    ProcessRole, Probe, ProbeOutcome, SupervisorError, SupervisorResult, UiLayer, WindowRef,
};

use std::collections::{HashSet, VecDeque};
use std::panic::Location;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use error_location::ErrorLocation;

/// PIDs above the largest Linux pid_max, so probes never hit a real process.
pub(crate) const FAKE_PID_BASE: u32 = 5_000_000;

/// Config tuned for fast tests: tight backoff, short exit grace.
pub(crate) fn fast_config() -> LauncherConfig {
    let mut config = LauncherConfig::default();
    config.readiness.initial_backoff_ms = 1;
    config.readiness.max_backoff_ms = 5;
    config.readiness.startup_timeout_secs = 0;
    config.shutdown.exit_grace_ms = 50;
    config
}

// =============================================================================
// Probe fakes
// =============================================================================

/// Returns scripted outcomes in order, then `fallback` forever.
pub(crate) struct ScriptedProbe {
    outcomes: Mutex<VecDeque<ProbeOutcome>>,
    fallback: ProbeOutcome,
    attempts: AtomicU32,
}

impl ScriptedProbe {
    pub(crate) fn new(outcomes: Vec<ProbeOutcome>, fallback: ProbeOutcome) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            fallback,
            attempts: AtomicU32::new(0),
        }
    }

    pub(crate) fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Probe for ScriptedProbe {
    async fn probe(&self, _url: &str) -> ProbeOutcome {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

/// Never answers.
pub(crate) struct HangingProbe;

#[async_trait]
impl Probe for HangingProbe {
    async fn probe(&self, _url: &str) -> ProbeOutcome {
        std::future::pending().await
    }
}

// =============================================================================
// Process control fake
// =============================================================================

/// Records every escalation step; can fail chosen steps.
#[derive(Default)]
pub(crate) struct RecordingControl {
    calls: Mutex<Vec<(EscalationStep, u32)>>,
    images: Mutex<Vec<String>>,
    failing: Mutex<HashSet<EscalationStep>>,
    gone: Mutex<HashSet<u32>>,
    stubborn: Mutex<HashSet<u32>>,
    delay: Option<Duration>,
}

impl RecordingControl {
    pub(crate) fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub(crate) fn fail_on(&self, step: EscalationStep) {
        self.failing.lock().unwrap().insert(step);
    }

    /// Report the PID as already exited for every step.
    pub(crate) fn mark_gone(&self, pid: u32) {
        self.gone.lock().unwrap().insert(pid);
    }

    /// Keep reporting the PID as running after termination.
    pub(crate) fn mark_stubborn(&self, pid: u32) {
        self.stubborn.lock().unwrap().insert(pid);
    }

    pub(crate) fn calls(&self) -> Vec<(EscalationStep, u32)> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn images(&self) -> Vec<String> {
        self.images.lock().unwrap().clone()
    }

    async fn record(&self, step: EscalationStep, pid: u32) -> SupervisorResult<()> {
        self.calls.lock().unwrap().push((step, pid));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.gone.lock().unwrap().contains(&pid) {
            return Err(SupervisorError::ProcessNotFound {
                pid,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if self.failing.lock().unwrap().contains(&step) {
            return Err(SupervisorError::Termination {
                step,
                pid,
                message: "simulated failure".into(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(())
    }
}

#[async_trait]
impl ProcessControl for RecordingControl {
    async fn tree_kill(&self, pid: u32) -> SupervisorResult<()> {
        self.record(EscalationStep::TreeKill, pid).await
    }

    async fn kill_by_image_name(&self, pid: u32, image: &str) -> SupervisorResult<()> {
        self.images.lock().unwrap().push(image.to_string());
        self.record(EscalationStep::KillByImageName, pid).await
    }

    async fn signal_group(&self, pid: u32) -> SupervisorResult<()> {
        self.record(EscalationStep::SignalGroup, pid).await
    }

    async fn interrupt(&self, pid: u32) -> SupervisorResult<()> {
        self.record(EscalationStep::Interrupt, pid).await
    }

    fn is_running(&self, pid: u32) -> bool {
        self.stubborn.lock().unwrap().contains(&pid)
    }
}

// =============================================================================
// Launcher fake
// =============================================================================

/// Hands out adopted handles with fake PIDs; can fail chosen roles.
pub(crate) struct FakeLauncher {
    next_pid: AtomicU32,
    failing: HashSet<ProcessRole>,
    launched: Mutex<Vec<LaunchSpec>>,
}

impl FakeLauncher {
    pub(crate) fn new() -> Self {
        Self {
            next_pid: AtomicU32::new(FAKE_PID_BASE),
            failing: HashSet::new(),
            launched: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing(role: ProcessRole) -> Self {
        let mut launcher = Self::new();
        launcher.failing.insert(role);
        launcher
    }

    pub(crate) fn launched_roles(&self) -> Vec<ProcessRole> {
        self.launched.lock().unwrap().iter().map(|s| s.role).collect()
    }
}

impl ProcessLauncher for FakeLauncher {
    fn launch(&self, spec: &LaunchSpec) -> SupervisorResult<ProcessHandle> {
        self.launched.lock().unwrap().push(spec.clone());

        if self.failing.contains(&spec.role) {
            return Err(SupervisorError::BinaryNotFound {
                path: spec.executable_path.clone(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let pid = self.next_pid.fetch_add(1, Ordering::SeqCst);
        Ok(ProcessHandle::adopt(
            pid,
            spec.executable_path.clone(),
            spec.role,
        ))
    }
}

// =============================================================================
// UI fake
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum UiCall {
    Created(String),
    Displayed(String),
    Failure(String),
    Destroyed(String),
}

#[derive(Default)]
pub(crate) struct RecordingUi {
    calls: Mutex<Vec<UiCall>>,
    windows_created: AtomicU32,
}

impl RecordingUi {
    pub(crate) fn calls(&self) -> Vec<UiCall> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn displayed(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                UiCall::Displayed(url) => Some(url),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn failures(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                UiCall::Failure(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn created_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, UiCall::Created(_)))
            .count()
    }

    pub(crate) fn destroyed_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, UiCall::Destroyed(_)))
            .count()
    }
}

impl UiLayer for RecordingUi {
    fn create_window(&self) -> SupervisorResult<WindowRef> {
        let n = self.windows_created.fetch_add(1, Ordering::SeqCst);
        let window = WindowRef::new(format!("main-{n}"));
        self.calls
            .lock()
            .unwrap()
            .push(UiCall::Created(window.label().to_string()));
        Ok(window)
    }

    fn display_url(&self, _window: &WindowRef, url: &str) -> SupervisorResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push(UiCall::Displayed(url.to_string()));
        Ok(())
    }

    fn show_startup_failure(&self, _window: &WindowRef, message: &str) -> SupervisorResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push(UiCall::Failure(message.to_string()));
        Ok(())
    }

    fn destroy_window(&self, window: &WindowRef) -> SupervisorResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push(UiCall::Destroyed(window.label().to_string()));
        Ok(())
    }
}

/// Write an executable shell script into `dir`.
#[cfg(unix)]
pub(crate) fn write_script(
    dir: &std::path::Path,
    name: &str,
    body: &str,
) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}
