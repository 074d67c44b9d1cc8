use std::time::Duration;

/// How a readiness poll run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadinessOutcome {
    /// An attempt observed HTTP 200
    Ready { attempts: u32 },
    /// Cancelled before the backend became ready
    Cancelled { attempts: u32 },
    /// Stopped on an error outside the retryable classes
    Abandoned { attempts: u32, error: String },
    /// Maximum wait elapsed
    TimedOut { attempts: u32, waited: Duration },
}

impl ReadinessOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }

    pub fn attempts(&self) -> u32 {
        match self {
            Self::Ready { attempts }
            | Self::Cancelled { attempts }
            | Self::Abandoned { attempts, .. }
            | Self::TimedOut { attempts, .. } => *attempts,
        }
    }
}
