use crate::process::ProcessHandle;
use crate::shutdown::TerminationReport;
use crate::supervisor::WindowRef;

/// Everything the supervisor tracks across trigger paths.
#[derive(Debug, Default)]
pub struct SupervisorState {
    pub window: Option<WindowRef>,
    pub server: Option<ProcessHandle>,
    pub daemon: Option<ProcessHandle>,
    pub last_termination: Option<TerminationReport>,
}

impl SupervisorState {
    pub fn handles_mut(&mut self) -> Vec<&mut ProcessHandle> {
        self.server
            .iter_mut()
            .chain(self.daemon.iter_mut())
            .collect()
    }
}
