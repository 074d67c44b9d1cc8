//! OS-level process termination primitives.

use crate::process::is_process_running;
use crate::shutdown::EscalationStep;
use crate::{SupervisorError, SupervisorResult};

use std::panic::Location;

use async_trait::async_trait;
use error_location::ErrorLocation;
use tracing::debug;

/// `taskkill` exit code when no matching process exists.
const TASKKILL_NOT_FOUND: i32 = 128;

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// The individual OS actions an escalation sequence is made of.
///
/// Every method reports failure instead of panicking; a missing process is
/// reported as [`SupervisorError::ProcessNotFound`].
#[async_trait]
pub trait ProcessControl: Send + Sync {
    /// `taskkill /F /T /PID <pid>`
    async fn tree_kill(&self, pid: u32) -> SupervisorResult<()>;

    /// `taskkill /IM <image>`
    async fn kill_by_image_name(&self, pid: u32, image: &str) -> SupervisorResult<()>;

    /// Signal the process group led by `pid`.
    async fn signal_group(&self, pid: u32) -> SupervisorResult<()>;

    /// Interrupt the process itself.
    async fn interrupt(&self, pid: u32) -> SupervisorResult<()>;

    fn is_running(&self, pid: u32) -> bool;
}

/// Real OS implementation.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProcessControl;

impl SystemProcessControl {
    async fn taskkill(step: EscalationStep, pid: u32, args: &[String]) -> SupervisorResult<()> {
        let mut cmd = tokio::process::Command::new("taskkill");
        cmd.args(args);

        #[cfg(windows)]
        cmd.creation_flags(CREATE_NO_WINDOW);

        let output = cmd.output().await.map_err(|e| SupervisorError::Termination {
            step,
            pid,
            message: format!("failed to run taskkill: {e}"),
            location: ErrorLocation::from(Location::caller()),
        })?;

        if output.status.success() {
            debug!("taskkill {} succeeded", args.join(" "));
            return Ok(());
        }

        if output.status.code() == Some(TASKKILL_NOT_FOUND) {
            return Err(SupervisorError::ProcessNotFound {
                pid,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Err(SupervisorError::Termination {
            step,
            pid,
            message: format!(
                "taskkill exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    #[cfg(unix)]
    fn to_unix_pid(step: EscalationStep, pid: u32) -> SupervisorResult<nix::unistd::Pid> {
        match i32::try_from(pid) {
            // 0 and negatives address whole groups, including our own
            Ok(raw) if raw > 0 => Ok(nix::unistd::Pid::from_raw(raw)),
            _ => Err(SupervisorError::Termination {
                step,
                pid,
                message: "refusing to signal a non-positive PID".into(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }

    #[cfg(unix)]
    fn map_errno(step: EscalationStep, pid: u32, errno: nix::errno::Errno) -> SupervisorError {
        if errno == nix::errno::Errno::ESRCH {
            SupervisorError::ProcessNotFound {
                pid,
                location: ErrorLocation::from(Location::caller()),
            }
        } else {
            SupervisorError::Termination {
                step,
                pid,
                message: errno.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }
        }
    }
}

#[async_trait]
impl ProcessControl for SystemProcessControl {
    async fn tree_kill(&self, pid: u32) -> SupervisorResult<()> {
        let args = ["/F", "/T", "/PID"]
            .into_iter()
            .map(String::from)
            .chain(std::iter::once(pid.to_string()))
            .collect::<Vec<_>>();
        Self::taskkill(EscalationStep::TreeKill, pid, &args).await
    }

    async fn kill_by_image_name(&self, pid: u32, image: &str) -> SupervisorResult<()> {
        let args = vec!["/IM".to_string(), image.to_string()];
        Self::taskkill(EscalationStep::KillByImageName, pid, &args).await
    }

    #[cfg(unix)]
    async fn signal_group(&self, pid: u32) -> SupervisorResult<()> {
        use nix::sys::signal::{Signal, killpg};

        let pgrp = Self::to_unix_pid(EscalationStep::SignalGroup, pid)?;
        killpg(pgrp, Signal::SIGINT)
            .map_err(|e| Self::map_errno(EscalationStep::SignalGroup, pid, e))
    }

    #[cfg(windows)]
    async fn signal_group(&self, pid: u32) -> SupervisorResult<()> {
        use windows_sys::Win32::System::Console::{CTRL_BREAK_EVENT, GenerateConsoleCtrlEvent};

        // Children are spawned with CREATE_NEW_PROCESS_GROUP, so the group id is the PID.
        // They are also CREATE_NO_WINDOW, and a ctrl event cannot reach a hidden
        // console: this step normally fails and is logged, the other steps do the work.
        let ok = unsafe { GenerateConsoleCtrlEvent(CTRL_BREAK_EVENT, pid) };
        if ok == 0 {
            return Err(SupervisorError::Termination {
                step: EscalationStep::SignalGroup,
                pid,
                message: std::io::Error::last_os_error().to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(())
    }

    #[cfg(unix)]
    async fn interrupt(&self, pid: u32) -> SupervisorResult<()> {
        use nix::sys::signal::{Signal, kill};

        let target = Self::to_unix_pid(EscalationStep::Interrupt, pid)?;
        kill(target, Signal::SIGINT).map_err(|e| Self::map_errno(EscalationStep::Interrupt, pid, e))
    }

    #[cfg(windows)]
    async fn interrupt(&self, pid: u32) -> SupervisorResult<()> {
        use windows_sys::Win32::Foundation::CloseHandle;
        use windows_sys::Win32::System::Threading::{
            OpenProcess, PROCESS_TERMINATE, TerminateProcess,
        };

        unsafe {
            let handle = OpenProcess(PROCESS_TERMINATE, 0, pid);
            if handle.is_null() {
                return Err(SupervisorError::ProcessNotFound {
                    pid,
                    location: ErrorLocation::from(Location::caller()),
                });
            }

            let ok = TerminateProcess(handle, 1);
            let err = std::io::Error::last_os_error();
            CloseHandle(handle);

            if ok == 0 {
                return Err(SupervisorError::Termination {
                    step: EscalationStep::Interrupt,
                    pid,
                    message: err.to_string(),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        }
        Ok(())
    }

    fn is_running(&self, pid: u32) -> bool {
        is_process_running(pid)
    }
}
