use std::fmt;

/// Liveness of a supervised child process.
///
/// States only move forward: `Running -> Unknown -> Terminated`.
/// `Terminated` is absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ProcessState {
    /// Process was spawned and has not been observed to exit
    Running,
    /// Liveness could not be determined (probe failed)
    Unknown,
    /// Process exited on its own or shutdown confirmed it gone
    Terminated,
}

impl ProcessState {
    /// Whether moving from `self` to `next` respects forward-only ordering.
    pub fn can_transition_to(self, next: ProcessState) -> bool {
        next >= self
    }
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => write!(f, "running"),
            Self::Unknown => write!(f, "unknown"),
            Self::Terminated => write!(f, "terminated"),
        }
    }
}
