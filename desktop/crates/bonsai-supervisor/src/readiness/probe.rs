use crate::readiness::ReadinessResult;

use async_trait::async_trait;

const READY_STATUS: u16 = 200;

/// What one readiness probe observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The server answered with this HTTP status
    Status(u16),
    /// Nothing is listening yet
    ConnectionRefused(String),
    /// The OS rejected the connection attempt as invalid
    InvalidArgument(String),
    /// Our own request timeout elapsed
    TimedOut(String),
    /// Any other network failure (DNS, TLS, protocol)
    Failed(String),
}

/// What the poller should do after an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeDisposition {
    Ready,
    Retry,
    GiveUp,
}

impl ProbeOutcome {
    pub fn disposition(&self) -> ProbeDisposition {
        match self {
            Self::Status(READY_STATUS) => ProbeDisposition::Ready,
            Self::Status(_)
            | Self::ConnectionRefused(_)
            | Self::InvalidArgument(_)
            | Self::TimedOut(_) => ProbeDisposition::Retry,
            Self::Failed(_) => ProbeDisposition::GiveUp,
        }
    }

    pub fn to_result(&self) -> ReadinessResult {
        match self {
            Self::Status(READY_STATUS) => ReadinessResult::ready(),
            Self::Status(code) => ReadinessResult::not_ready(format!("HTTP {code}")),
            Self::ConnectionRefused(msg)
            | Self::InvalidArgument(msg)
            | Self::TimedOut(msg)
            | Self::Failed(msg) => ReadinessResult::not_ready(msg.clone()),
        }
    }
}

/// A single readiness check against a URL.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn probe(&self, url: &str) -> ProbeOutcome;
}
