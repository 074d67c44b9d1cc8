use crate::process::ProcessRole;
use crate::shutdown::EscalationStep;

/// What happened while stopping one process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandleTermination {
    pub role: ProcessRole,
    pub pid: u32,
    pub attempted: Vec<EscalationStep>,
    pub failed: Vec<EscalationStep>,
    pub confirmed_exit: bool,
    /// Already terminated before this run, nothing attempted
    pub skipped: bool,
}

/// Outcome of one `terminate_all` run, in teardown order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TerminationReport {
    pub handles: Vec<HandleTermination>,
}

impl TerminationReport {
    pub fn all_confirmed(&self) -> bool {
        self.handles.iter().all(|h| h.confirmed_exit)
    }

    pub fn for_role(&self, role: ProcessRole) -> Option<&HandleTermination> {
        self.handles.iter().find(|h| h.role == role)
    }
}
