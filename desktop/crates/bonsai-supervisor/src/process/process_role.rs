use std::fmt;

/// Which backend component a child process is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcessRole {
    /// HTTP server hosting the web UI
    Server,
    /// Background worker with no dependents
    Daemon,
}

impl ProcessRole {
    /// Position in the teardown sequence (lower stops first).
    ///
    /// The daemon has no dependents so it is stopped before the server.
    pub fn teardown_rank(self) -> u8 {
        match self {
            Self::Daemon => 0,
            Self::Server => 1,
        }
    }
}

impl fmt::Display for ProcessRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Server => write!(f, "server"),
            Self::Daemon => write!(f, "daemon"),
        }
    }
}
