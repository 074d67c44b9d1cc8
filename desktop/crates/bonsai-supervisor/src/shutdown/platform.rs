use crate::shutdown::EscalationStep;

use std::fmt;

const WINDOWS_ESCALATION: &[EscalationStep] = &[
    EscalationStep::TreeKill,
    EscalationStep::KillByImageName,
    EscalationStep::SignalGroup,
    EscalationStep::Interrupt,
];

const POSIX_ESCALATION: &[EscalationStep] = &[EscalationStep::Interrupt];

/// Operating system family, as far as process teardown is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Posix,
    Windows,
    MacOs,
}

impl Platform {
    /// Platform the launcher was compiled for.
    pub fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else {
            Self::Posix
        }
    }

    /// Steps attempted, in order, to stop one process.
    pub fn escalation_sequence(self) -> &'static [EscalationStep] {
        match self {
            Self::Windows => WINDOWS_ESCALATION,
            Self::Posix | Self::MacOs => POSIX_ESCALATION,
        }
    }

    /// Whether closing the last window should quit the application.
    ///
    /// macOS applications stay resident until an explicit quit.
    pub fn quits_when_windows_closed(self) -> bool {
        !matches!(self, Self::MacOs)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Posix => write!(f, "posix"),
            Self::Windows => write!(f, "windows"),
            Self::MacOs => write!(f, "macos"),
        }
    }
}
