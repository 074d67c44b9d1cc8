//! Platform-specific teardown of supervised processes.

use crate::process::{ProcessHandle, ProcessState};
use crate::shutdown::{
    EscalationStep, HandleTermination, Platform, ProcessControl, TerminationReport,
};
use crate::SupervisorResult;

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

const WINDOWS_IMAGE_SUFFIX: &str = ".exe";

/// Stops child processes with the platform escalation sequence.
///
/// Teardown never fails: every step error is logged and the remaining
/// steps still run. Processes that are already gone count as stopped.
#[derive(Clone)]
pub struct ShutdownCoordinator {
    control: Arc<dyn ProcessControl>,
    exit_grace: Duration,
}

impl ShutdownCoordinator {
    pub fn new(control: Arc<dyn ProcessControl>, exit_grace: Duration) -> Self {
        Self {
            control,
            exit_grace,
        }
    }

    /// Terminate every handle, daemon before server.
    ///
    /// Each handle's sequence finishes before the next handle starts.
    /// Handles already terminated are skipped, so repeated calls are safe.
    pub async fn terminate_all(
        &self,
        mut handles: Vec<&mut ProcessHandle>,
        platform: Platform,
    ) -> TerminationReport {
        handles.sort_by_key(|h| h.role().teardown_rank());

        let mut report = TerminationReport::default();
        for handle in handles {
            report.handles.push(self.terminate(handle, platform).await);
        }
        report
    }

    async fn terminate(&self, handle: &mut ProcessHandle, platform: Platform) -> HandleTermination {
        let mut outcome = HandleTermination {
            role: handle.role(),
            pid: handle.id(),
            attempted: Vec::new(),
            failed: Vec::new(),
            confirmed_exit: false,
            skipped: false,
        };

        if handle.state() == ProcessState::Terminated {
            debug!("{} (PID {}) already terminated", handle.role(), handle.id());
            outcome.confirmed_exit = true;
            outcome.skipped = true;
            return outcome;
        }

        info!(
            "Stopping {} '{}' (PID {}) on {platform}",
            handle.role(),
            handle.label(),
            handle.id()
        );

        for &step in platform.escalation_sequence() {
            outcome.attempted.push(step);
            match self.run_step(step, handle).await {
                Ok(()) => debug!("{step} sent to PID {}", handle.id()),
                Err(e) if e.is_process_gone() => {
                    debug!("{step}: PID {} already gone", handle.id());
                }
                Err(e) => {
                    warn!("{step} failed for {} (PID {}): {e}", handle.role(), handle.id());
                    outcome.failed.push(step);
                }
            }
        }

        outcome.confirmed_exit = handle
            .confirm_exit(self.exit_grace, self.control.as_ref())
            .await;

        if outcome.confirmed_exit {
            info!("{} (PID {}) stopped", handle.role(), handle.id());
        } else {
            warn!(
                "{} (PID {}) still running {}ms after termination",
                handle.role(),
                handle.id(),
                self.exit_grace.as_millis()
            );
        }

        outcome
    }

    async fn run_step(&self, step: EscalationStep, handle: &ProcessHandle) -> SupervisorResult<()> {
        let pid = handle.id();
        match step {
            EscalationStep::TreeKill => self.control.tree_kill(pid).await,
            EscalationStep::KillByImageName => {
                self.control
                    .kill_by_image_name(pid, &image_name(handle.label()))
                    .await
            }
            EscalationStep::SignalGroup => self.control.signal_group(pid).await,
            EscalationStep::Interrupt => self.control.interrupt(pid).await,
        }
    }
}

fn image_name(label: &str) -> String {
    if label.to_ascii_lowercase().ends_with(WINDOWS_IMAGE_SUFFIX) {
        label.to_string()
    } else {
        format!("{label}{WINDOWS_IMAGE_SUFFIX}")
    }
}
