//! One supervised child process.

use crate::process::{LaunchSpec, ProcessRole, ProcessState, is_process_running};
use crate::shutdown::ProcessControl;
use crate::{SupervisorError, SupervisorResult};

use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use error_location::ErrorLocation;
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;
#[cfg(windows)]
const CREATE_NEW_PROCESS_GROUP: u32 = 0x0000_0200;

/// Children of the GUI-subsystem launcher get no console window.
#[cfg(windows)]
pub(crate) const CHILD_CREATION_FLAGS: u32 = CREATE_NO_WINDOW | CREATE_NEW_PROCESS_GROUP;

const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Wraps a spawned child process: its PID, executable identity and liveness.
///
/// Owned exclusively by the supervisor. The state only moves forward, see
/// [`ProcessState`].
#[derive(Debug)]
pub struct ProcessHandle {
    id: u32,
    executable_path: PathBuf,
    label: String,
    role: ProcessRole,
    state: ProcessState,
    child: Option<Child>,
}

impl ProcessHandle {
    /// Spawn a child process.
    ///
    /// stdout and stderr are inherited so the backend's own diagnostics end
    /// up next to the launcher's. On Unix the child gets its own process
    /// group so a terminal Ctrl-C only reaches the launcher, which then runs
    /// the orderly shutdown. On Windows the child is hidden and leads a new
    /// process group.
    pub fn spawn(spec: &LaunchSpec) -> SupervisorResult<Self> {
        let path = &spec.executable_path;
        Self::check_executable(path)?;

        let mut cmd = Command::new(path);
        cmd.args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        #[cfg(unix)]
        cmd.process_group(0);

        #[cfg(windows)]
        cmd.creation_flags(CHILD_CREATION_FLAGS);

        let child = cmd.spawn().map_err(|e| SupervisorError::ProcessSpawn {
            path: path.clone(),
            source: e,
            location: ErrorLocation::from(Location::caller()),
        })?;

        let id = child.id().ok_or_else(|| SupervisorError::ProcessSpawn {
            path: path.clone(),
            source: std::io::Error::other("process exited before its PID could be read"),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let label = spec.label();
        info!("Spawned {} '{}' with PID {id}", spec.role, label);

        Ok(Self {
            id,
            executable_path: path.clone(),
            label,
            role: spec.role,
            state: ProcessState::Running,
            child: Some(child),
        })
    }

    /// Track a process that was started elsewhere, known only by PID.
    pub fn adopt(id: u32, executable_path: impl Into<PathBuf>, role: ProcessRole) -> Self {
        let spec = LaunchSpec::new(role, executable_path);
        Self {
            id,
            label: spec.label(),
            executable_path: spec.executable_path,
            role,
            state: ProcessState::Running,
            child: None,
        }
    }

    fn check_executable(path: &Path) -> SupervisorResult<()> {
        let metadata = match std::fs::metadata(path) {
            Ok(m) => m,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SupervisorError::BinaryNotFound {
                    path: path.to_path_buf(),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
            Err(e) => return Err(e.into()),
        };

        if !metadata.is_file() {
            return Err(SupervisorError::NotExecutable {
                path: path.to_path_buf(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            if metadata.permissions().mode() & 0o111 == 0 {
                return Err(SupervisorError::NotExecutable {
                    path: path.to_path_buf(),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        }

        Ok(())
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn role(&self) -> ProcessRole {
        self.role
    }

    pub fn executable_path(&self) -> &Path {
        &self.executable_path
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    /// Non-blocking liveness check.
    ///
    /// An owned child that has exited is reaped and marked terminated.
    /// Adopted processes fall back to a PID probe.
    pub fn is_alive(&mut self) -> bool {
        if self.state == ProcessState::Terminated {
            return false;
        }

        let alive = match self.child.as_mut() {
            Some(child) => match child.try_wait() {
                Ok(Some(status)) => {
                    info!("{} '{}' exited with {status}", self.role, self.label);
                    false
                }
                Ok(None) => true,
                Err(e) => {
                    warn!("Failed to query {} '{}': {e}", self.role, self.label);
                    self.transition(ProcessState::Unknown);
                    return true;
                }
            },
            None => is_process_running(self.id),
        };

        if !alive {
            self.transition(ProcessState::Terminated);
        }
        alive
    }

    /// Move to `next` if that is a forward transition.
    ///
    /// Returns false (and leaves the state untouched) for backward moves.
    pub fn transition(&mut self, next: ProcessState) -> bool {
        if !self.state.can_transition_to(next) {
            debug!(
                "Ignoring backward transition {} -> {next} for PID {}",
                self.state, self.id
            );
            return false;
        }
        self.state = next;
        true
    }

    /// Wait up to `grace` for the process to go away, marking it terminated
    /// when it does.
    pub(crate) async fn confirm_exit(
        &mut self,
        grace: Duration,
        control: &dyn ProcessControl,
    ) -> bool {
        if self.state == ProcessState::Terminated {
            return true;
        }

        let exited = match self.child.as_mut() {
            Some(child) => match tokio::time::timeout(grace, child.wait()).await {
                Ok(Ok(status)) => {
                    debug!("{} '{}' exited with {status}", self.role, self.label);
                    true
                }
                Ok(Err(e)) => {
                    warn!("Failed to wait for {} '{}': {e}", self.role, self.label);
                    false
                }
                Err(_) => false,
            },
            None => {
                let start = Instant::now();
                loop {
                    if !control.is_running(self.id) {
                        break true;
                    }
                    if start.elapsed() >= grace {
                        break false;
                    }
                    tokio::time::sleep(EXIT_POLL_INTERVAL).await;
                }
            }
        };

        if exited {
            self.transition(ProcessState::Terminated);
        }
        exited
    }
}
