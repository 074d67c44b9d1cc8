mod escalation_step;
mod platform;
mod process_control;
mod shutdown_coordinator;
mod termination_report;

pub use escalation_step::EscalationStep;
pub use platform::Platform;
pub use process_control::{ProcessControl, SystemProcessControl};
pub use shutdown_coordinator::ShutdownCoordinator;
pub use termination_report::{HandleTermination, TerminationReport};
