use crate::SupervisorResult;
use crate::process::{LaunchSpec, ProcessHandle};

/// Starts child processes for the supervisor.
///
/// The system implementation spawns real OS processes; tests substitute
/// launchers that hand out adopted handles.
pub trait ProcessLauncher: Send + Sync {
    fn launch(&self, spec: &LaunchSpec) -> SupervisorResult<ProcessHandle>;
}

/// Spawns real processes via [`ProcessHandle::spawn`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

impl ProcessLauncher for SystemLauncher {
    fn launch(&self, spec: &LaunchSpec) -> SupervisorResult<ProcessHandle> {
        ProcessHandle::spawn(spec)
    }
}
