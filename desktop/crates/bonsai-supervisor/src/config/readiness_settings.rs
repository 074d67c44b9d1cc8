use crate::config::{
    default_initial_backoff, default_max_backoff, default_request_timeout, default_startup_timeout,
};
use crate::readiness::PollPolicy;

use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessSettings {
    /// Delay after the first failed attempt (milliseconds)
    #[serde(default = "default_initial_backoff")]
    pub initial_backoff_ms: u64,

    /// Upper bound on the delay between attempts (milliseconds)
    #[serde(default = "default_max_backoff")]
    pub max_backoff_ms: u64,

    /// Timeout of a single HTTP probe (milliseconds)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,

    /// Give up waiting after this long (seconds, 0 = wait forever)
    #[serde(default = "default_startup_timeout")]
    pub startup_timeout_secs: u64,
}

impl ReadinessSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            initial_backoff: Duration::from_millis(self.initial_backoff_ms),
            max_backoff: Duration::from_millis(self.max_backoff_ms),
            max_wait: (self.startup_timeout_secs > 0)
                .then(|| Duration::from_secs(self.startup_timeout_secs)),
        }
    }
}

impl Default for ReadinessSettings {
    fn default() -> Self {
        Self {
            initial_backoff_ms: default_initial_backoff(),
            max_backoff_ms: default_max_backoff(),
            request_timeout_ms: default_request_timeout(),
            startup_timeout_secs: default_startup_timeout(),
        }
    }
}
