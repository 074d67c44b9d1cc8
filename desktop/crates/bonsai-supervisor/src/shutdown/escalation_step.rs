use std::fmt;

/// One termination attempt in a platform escalation sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EscalationStep {
    /// Forceful kill of the process and its children by PID
    TreeKill,
    /// Sweep any leftover process with the same image name
    KillByImageName,
    /// Signal the child's process group
    SignalGroup,
    /// Interrupt the process itself
    Interrupt,
}

impl fmt::Display for EscalationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TreeKill => write!(f, "tree-kill"),
            Self::KillByImageName => write!(f, "kill-by-image-name"),
            Self::SignalGroup => write!(f, "signal-group"),
            Self::Interrupt => write!(f, "interrupt"),
        }
    }
}
