//! Readiness probe over plain HTTP.

use crate::readiness::{Probe, ProbeOutcome};
use crate::SupervisorResult;

use std::error::Error as StdError;
use std::time::Duration;

use async_trait::async_trait;

/// Issues `GET <url>` and reports the status or classified failure.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: reqwest::Client,
}

impl HttpProbe {
    pub fn new(request_timeout: Duration) -> SupervisorResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .pool_max_idle_per_host(0)
            .build()?;

        Ok(Self { client })
    }

    /// Sort a request error into the classes the poller cares about.
    pub fn classify(err: &reqwest::Error) -> ProbeOutcome {
        let message = err.to_string();

        if err.is_timeout() {
            return ProbeOutcome::TimedOut(message);
        }

        let mut source: Option<&(dyn StdError + 'static)> = err.source();
        while let Some(cause) = source {
            if let Some(io) = cause.downcast_ref::<std::io::Error>() {
                match io.kind() {
                    std::io::ErrorKind::ConnectionRefused => {
                        return ProbeOutcome::ConnectionRefused(io.to_string());
                    }
                    std::io::ErrorKind::InvalidInput => {
                        return ProbeOutcome::InvalidArgument(io.to_string());
                    }
                    _ => {}
                }
            }
            source = cause.source();
        }

        ProbeOutcome::Failed(message)
    }
}

#[async_trait]
impl Probe for HttpProbe {
    async fn probe(&self, url: &str) -> ProbeOutcome {
        match self.client.get(url).send().await {
            Ok(resp) => ProbeOutcome::Status(resp.status().as_u16()),
            Err(e) => Self::classify(&e),
        }
    }
}
