/// Result of a single readiness attempt. Transient, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadinessResult {
    pub ready: bool,
    pub last_error: Option<String>,
}

impl ReadinessResult {
    pub fn ready() -> Self {
        Self {
            ready: true,
            last_error: None,
        }
    }

    pub fn not_ready(error: impl Into<String>) -> Self {
        Self {
            ready: false,
            last_error: Some(error.into()),
        }
    }
}
