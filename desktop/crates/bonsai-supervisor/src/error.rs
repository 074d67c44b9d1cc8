use crate::shutdown::EscalationStep;

use std::panic::Location;
use std::path::PathBuf;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SupervisorError {
    #[error("Executable not found at {path} {location}")]
    BinaryNotFound {
        path: PathBuf,
        location: ErrorLocation,
    },

    #[error("File at {path} is not executable {location}")]
    NotExecutable {
        path: PathBuf,
        location: ErrorLocation,
    },

    #[error("Failed to spawn {path}: {source} {location}")]
    ProcessSpawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("No process with PID {pid} {location}")]
    ProcessNotFound { pid: u32, location: ErrorLocation },

    #[error("Termination step {step} failed for PID {pid}: {message} {location}")]
    Termination {
        step: EscalationStep,
        pid: u32,
        message: String,
        location: ErrorLocation,
    },

    #[error("Readiness polling of {url} abandoned: {message} {location}")]
    ReadinessAbandoned {
        url: String,
        message: String,
        location: ErrorLocation,
    },

    #[error("Backend at {url} not ready within {timeout_secs}s {location}")]
    ReadinessTimeout {
        url: String,
        timeout_secs: u64,
        location: ErrorLocation,
    },

    #[error("Cannot {action} while supervisor is {phase} {location}")]
    InvalidTransition {
        action: &'static str,
        phase: String,
        location: ErrorLocation,
    },

    #[error("Window operation failed: {message} {location}")]
    Window {
        message: String,
        location: ErrorLocation,
    },

    #[error("Unknown UI command: {message} {location}")]
    UnknownCommand {
        message: String,
        location: ErrorLocation,
    },

    #[error("Configuration invalid: {message} {location}")]
    ConfigInvalid {
        message: String,
        location: ErrorLocation,
    },

    #[error("IO error: {source} {location}")]
    Io {
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("HTTP error: {source} {location}")]
    Http {
        #[source]
        source: reqwest::Error,
        location: ErrorLocation,
    },
}

impl SupervisorError {
    /// Whether the error means the target process is already gone.
    pub fn is_process_gone(&self) -> bool {
        matches!(self, Self::ProcessNotFound { .. })
    }

    pub fn recovery_hint(&self) -> &'static str {
        match self {
            Self::BinaryNotFound { .. } | Self::NotExecutable { .. } => {
                "The backend executables are missing or damaged. \
                   Please reinstall Bonsai DCA."
            }
            Self::ProcessSpawn { .. } => {
                "The backend could not be started. \
                   Check the logs and your antivirus settings, then restart the application."
            }
            Self::ReadinessTimeout { .. } => {
                "The backend is taking too long to start. \
                   Try restarting the application or check the logs."
            }
            Self::ReadinessAbandoned { .. } => {
                "The backend could not be reached. \
                   Check that nothing else is using the backend port, then restart."
            }
            Self::ConfigInvalid { .. } => {
                "Configuration file has invalid settings. \
                   Check the logs for details or delete the config file to use defaults."
            }
            _ => "An unexpected error occurred. Please check the logs for details.",
        }
    }
}

impl From<std::io::Error> for SupervisorError {
    #[track_caller]
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<reqwest::Error> for SupervisorError {
    #[track_caller]
    fn from(source: reqwest::Error) -> Self {
        Self::Http {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, SupervisorError>;
