mod binary_locator;
mod launch_spec;
mod launcher;
mod pid_probe;
mod process_handle;
mod process_role;
mod process_state;

pub use binary_locator::{BinaryLocator, executable_name};
pub use launch_spec::LaunchSpec;
pub use launcher::{ProcessLauncher, SystemLauncher};
pub use pid_probe::is_process_running;
pub use process_handle::ProcessHandle;
#[cfg(windows)]
pub(crate) use process_handle::CHILD_CREATION_FLAGS;
pub use process_role::ProcessRole;
pub use process_state::ProcessState;
