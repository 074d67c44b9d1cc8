//! Messages the UI layer sends over its command channel.

use crate::{SupervisorError, SupervisorResult};

use std::panic::Location;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

/// A command from the UI, encoded as `{"message": "<name>"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "message", rename_all = "kebab-case")]
pub enum UiCommand {
    /// Quit the application and stop the backend
    QuitApp,
}

impl UiCommand {
    /// Parse a bare message name such as `quit-app`.
    pub fn from_message(message: &str) -> SupervisorResult<Self> {
        match message {
            "quit-app" => Ok(Self::QuitApp),
            other => Err(SupervisorError::UnknownCommand {
                message: other.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}
