use std::fmt;

/// Lifecycle of the supervisor.
///
/// `Idle -> Starting -> Running -> ShuttingDown -> Terminated`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorPhase {
    /// Created, waiting for the application-ready signal
    Idle,
    /// Window requested, children being spawned
    Starting,
    /// Children spawned; backend readiness tracked separately
    Running,
    /// Teardown in progress
    ShuttingDown,
    /// Children stopped and window destroyed
    Terminated,
}

impl fmt::Display for SupervisorPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Starting => write!(f, "starting"),
            Self::Running => write!(f, "running"),
            Self::ShuttingDown => write!(f, "shutting_down"),
            Self::Terminated => write!(f, "terminated"),
        }
    }
}
