//! Poll the backend until it answers 200.

use crate::readiness::{CancelSignal, PollPolicy, Probe, ProbeDisposition, ReadinessOutcome};

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Repeatedly probes a URL until it is ready, the poll is cancelled, an
/// unrecoverable error shows up, or the optional deadline passes.
///
/// Attempts never overlap: the next one starts after the previous one
/// resolved and the backoff delay elapsed.
#[derive(Clone)]
pub struct ReadinessPoller {
    probe: Arc<dyn Probe>,
    policy: PollPolicy,
}

impl ReadinessPoller {
    pub fn new(probe: Arc<dyn Probe>, policy: PollPolicy) -> Self {
        Self { probe, policy }
    }

    pub fn policy(&self) -> &PollPolicy {
        &self.policy
    }

    /// Poll `url` until a terminal outcome.
    pub async fn poll_until_ready(&self, url: &str, cancel: &CancelSignal) -> ReadinessOutcome {
        let start = Instant::now();
        let mut attempts: u32 = 0;

        loop {
            if cancel.is_cancelled() {
                return ReadinessOutcome::Cancelled { attempts };
            }

            if let Some(max_wait) = self.policy.max_wait
                && start.elapsed() >= max_wait
            {
                warn!("{url} not ready after {attempts} attempts, giving up");
                return ReadinessOutcome::TimedOut {
                    attempts,
                    waited: start.elapsed(),
                };
            }

            attempts += 1;
            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => return ReadinessOutcome::Cancelled { attempts },
                outcome = self.probe.probe(url) => outcome,
            };

            let result = outcome.to_result();
            match outcome.disposition() {
                ProbeDisposition::Ready => {
                    if cancel.is_cancelled() {
                        return ReadinessOutcome::Cancelled { attempts };
                    }
                    info!("{url} ready after {attempts} attempt(s)");
                    return ReadinessOutcome::Ready { attempts };
                }
                ProbeDisposition::Retry => {
                    debug!(
                        "Attempt {attempts}: {url} not ready ({})",
                        result.last_error.as_deref().unwrap_or("unknown")
                    );
                }
                ProbeDisposition::GiveUp => {
                    let error = result.last_error.unwrap_or_default();
                    warn!("Readiness polling of {url} stopped: {error}");
                    return ReadinessOutcome::Abandoned { attempts, error };
                }
            }

            let delay = self.policy.delay_after(attempts);
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return ReadinessOutcome::Cancelled { attempts },
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }

    /// Fire-and-continue form: poll in a background task and call
    /// `on_ready` once if, and only if, the backend became ready and the
    /// poll was not cancelled.
    pub fn spawn<F, Fut>(
        &self,
        url: String,
        cancel: CancelSignal,
        on_ready: F,
    ) -> JoinHandle<ReadinessOutcome>
    where
        F: FnOnce(String) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let poller = self.clone();
        tokio::spawn(async move {
            let outcome = poller.poll_until_ready(&url, &cancel).await;
            if !outcome.is_ready() {
                return outcome;
            }
            if cancel.is_cancelled() {
                return ReadinessOutcome::Cancelled {
                    attempts: outcome.attempts(),
                };
            }
            on_ready(url).await;
            outcome
        })
    }
}
