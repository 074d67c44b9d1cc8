//! Process supervisor for the Bonsai DCA desktop launcher.
//!
//! Spawns the backend server and daemon, waits for the server to answer
//! over HTTP, tells the UI layer when to show it, and tears both processes
//! down exactly once when the application quits.

mod command;
mod config;
mod error;
mod process;
mod readiness;
mod shutdown;
mod supervisor;

#[cfg(test)]
mod tests;

pub use command::UiCommand;
pub use config::{
    BackendSettings, CONFIG_FILENAME, CONFIG_VERSION, DEFAULT_HOST, DEFAULT_PORT, LauncherConfig,
    LoggingSettings, ReadinessSettings, ShutdownSettings,
};
pub use error::{Result as SupervisorResult, SupervisorError};
pub use process::{
    BinaryLocator, LaunchSpec, ProcessHandle, ProcessLauncher, ProcessRole, ProcessState,
    SystemLauncher, executable_name, is_process_running,
};
pub use readiness::{
    CancelSignal, HttpProbe, PollPolicy, Probe, ProbeDisposition, ProbeOutcome, ReadinessOutcome,
    ReadinessPoller, ReadinessResult,
};
pub use shutdown::{
    EscalationStep, HandleTermination, Platform, ProcessControl, ShutdownCoordinator,
    SystemProcessControl, TerminationReport,
};
pub use supervisor::{LifecycleEvent, Supervisor, SupervisorPhase, SupervisorState, UiLayer, WindowRef};
