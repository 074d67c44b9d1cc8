use crate::config::default_exit_grace;

use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShutdownSettings {
    /// How long to wait for each process to exit after its escalation (milliseconds)
    #[serde(default = "default_exit_grace")]
    pub exit_grace_ms: u64,
}

impl ShutdownSettings {
    pub fn exit_grace(&self) -> Duration {
        Duration::from_millis(self.exit_grace_ms)
    }
}

impl Default for ShutdownSettings {
    fn default() -> Self {
        Self {
            exit_grace_ms: default_exit_grace(),
        }
    }
}
