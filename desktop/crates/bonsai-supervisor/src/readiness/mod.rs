mod cancel_signal;
mod http_probe;
mod poll_policy;
mod probe;
mod readiness_outcome;
mod readiness_poller;
mod readiness_result;

pub use cancel_signal::CancelSignal;
pub use http_probe::HttpProbe;
pub use poll_policy::PollPolicy;
pub use probe::{Probe, ProbeDisposition, ProbeOutcome};
pub use readiness_outcome::ReadinessOutcome;
pub use readiness_poller::ReadinessPoller;
pub use readiness_result::ReadinessResult;
