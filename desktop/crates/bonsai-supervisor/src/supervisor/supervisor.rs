//! Top-level orchestration of the backend processes.

use crate::command::UiCommand;
use crate::config::LauncherConfig;
use crate::process::{
    BinaryLocator, LaunchSpec, ProcessHandle, ProcessLauncher, ProcessRole, ProcessState,
    SystemLauncher,
};
use crate::readiness::{CancelSignal, HttpProbe, Probe, ReadinessOutcome, ReadinessPoller};
use crate::shutdown::{
    Platform, ProcessControl, ShutdownCoordinator, SystemProcessControl, TerminationReport,
};
use crate::supervisor::{LifecycleEvent, SupervisorPhase, SupervisorState, UiLayer};
use crate::{SupervisorError, SupervisorResult};

use std::panic::Location;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use error_location::ErrorLocation;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Launches the backend server and daemon, shows the UI once the server is
/// reachable, and owns the single shutdown path.
///
/// Responsibilities:
/// - Spawn server and daemon, tolerating failure of either
/// - Poll the server until ready and hand its URL to the UI
/// - Map window/quit/signal triggers onto at-most-once teardown
pub struct Supervisor {
    config: LauncherConfig,
    platform: Platform,
    locator: BinaryLocator,
    launcher: Arc<dyn ProcessLauncher>,
    poller: ReadinessPoller,
    coordinator: ShutdownCoordinator,
    ui: Arc<dyn UiLayer>,
    state: Arc<Mutex<SupervisorState>>,
    quit_in_progress: Arc<AtomicBool>,
    backend_ready: Arc<AtomicBool>,
    cancel: CancelSignal,
    phase_tx: watch::Sender<SupervisorPhase>,
    phase_rx: watch::Receiver<SupervisorPhase>,
    readiness_task: Mutex<Option<JoinHandle<ReadinessOutcome>>>,
}

impl Supervisor {
    /// Create a supervisor with the real OS launcher, HTTP probe and process
    /// control for the current platform.
    pub fn new(config: LauncherConfig, ui: Arc<dyn UiLayer>) -> SupervisorResult<Self> {
        let probe = Arc::new(HttpProbe::new(config.readiness.request_timeout())?);
        let poller = ReadinessPoller::new(probe, config.readiness.poll_policy());
        let coordinator = ShutdownCoordinator::new(
            Arc::new(SystemProcessControl),
            config.shutdown.exit_grace(),
        );
        let locator = BinaryLocator::standard(
            config.backend.binaries_dir.as_deref().map(std::path::Path::new),
            None,
        );
        let (phase_tx, phase_rx) = watch::channel(SupervisorPhase::Idle);

        Ok(Self {
            config,
            platform: Platform::current(),
            locator,
            launcher: Arc::new(SystemLauncher),
            poller,
            coordinator,
            ui,
            state: Arc::new(Mutex::new(SupervisorState::default())),
            quit_in_progress: Arc::new(AtomicBool::new(false)),
            backend_ready: Arc::new(AtomicBool::new(false)),
            cancel: CancelSignal::new(),
            phase_tx,
            phase_rx,
            readiness_task: Mutex::new(None),
        })
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn with_locator(mut self, locator: BinaryLocator) -> Self {
        self.locator = locator;
        self
    }

    pub fn with_launcher(mut self, launcher: Arc<dyn ProcessLauncher>) -> Self {
        self.launcher = launcher;
        self
    }

    pub fn with_probe(mut self, probe: Arc<dyn Probe>) -> Self {
        self.poller = ReadinessPoller::new(probe, *self.poller.policy());
        self
    }

    pub fn with_process_control(mut self, control: Arc<dyn ProcessControl>) -> Self {
        self.coordinator = ShutdownCoordinator::new(control, self.config.shutdown.exit_grace());
        self
    }

    pub fn config(&self) -> &LauncherConfig {
        &self.config
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn phase(&self) -> SupervisorPhase {
        *self.phase_rx.borrow()
    }

    /// Subscribe to phase changes.
    pub fn subscribe(&self) -> watch::Receiver<SupervisorPhase> {
        self.phase_rx.clone()
    }

    pub fn is_backend_ready(&self) -> bool {
        self.backend_ready.load(Ordering::SeqCst)
    }

    pub fn is_quitting(&self) -> bool {
        self.quit_in_progress.load(Ordering::SeqCst)
    }

    /// Bring up the window, server and daemon, then start readiness polling.
    ///
    /// Only valid from `Idle`. Spawn failures are logged and do not stop the
    /// other process from being started. A server that cannot be spawned is
    /// reported to the user and readiness polling is skipped.
    pub async fn start(&self) -> SupervisorResult<()> {
        if !self.advance(SupervisorPhase::Idle, SupervisorPhase::Starting) {
            return Err(SupervisorError::InvalidTransition {
                action: "start",
                phase: self.phase().to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        info!(
            "Starting backend on {} ({})",
            self.config.backend_url(),
            self.platform
        );

        let server_failure = {
            let mut state = self.state.lock().await;

            // Shutdown won the race for the state; leave nothing behind
            if self.is_quitting() {
                info!("Shutdown requested during startup, not spawning backend");
                return Ok(());
            }

            state.window = match self.ui.create_window() {
                Ok(window) => Some(window),
                Err(e) => {
                    error!("Failed to create window: {e}");
                    None
                }
            };

            let server = self.launch(ProcessRole::Server);
            let daemon = self.launch(ProcessRole::Daemon);

            let failure = server
                .as_ref()
                .err()
                .map(|e| format!("{e}\n\nHint: {}", e.recovery_hint()));

            state.server = server.ok();
            state.daemon = daemon.ok();

            if let (Some(message), Some(window)) = (&failure, &state.window)
                && let Err(e) = self.ui.show_startup_failure(window, message)
            {
                warn!("Failed to show startup failure: {e}");
            }
            failure
        };

        self.advance(SupervisorPhase::Starting, SupervisorPhase::Running);

        if server_failure.is_some() {
            warn!("Server did not start, skipping readiness polling");
            return Ok(());
        }

        self.start_readiness().await;
        Ok(())
    }

    fn launch(&self, role: ProcessRole) -> SupervisorResult<ProcessHandle> {
        let base = match role {
            ProcessRole::Server => &self.config.backend.server_executable,
            ProcessRole::Daemon => &self.config.backend.daemon_executable,
        };
        let spec = LaunchSpec::new(role, self.locator.resolve(base));

        self.launcher.launch(&spec).inspect_err(|e| {
            error!("Failed to start {role}: {e}");
        })
    }

    async fn start_readiness(&self) {
        let url = self.config.backend_url();
        let timeout_secs = self.config.readiness.startup_timeout_secs;

        let ui = self.ui.clone();
        let state = self.state.clone();
        let quitting = self.quit_in_progress.clone();
        let ready = self.backend_ready.clone();

        let poll = self
            .poller
            .spawn(url.clone(), self.cancel.clone(), move |url| async move {
                Self::display_when_ready(ui.as_ref(), &state, &quitting, &ready, &url).await;
            });

        let ui = self.ui.clone();
        let state = self.state.clone();
        let quitting = self.quit_in_progress.clone();

        let watcher = tokio::spawn(async move {
            let outcome = match poll.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!("Readiness task failed: {e}");
                    return ReadinessOutcome::Cancelled { attempts: 0 };
                }
            };

            let failure = match &outcome {
                ReadinessOutcome::TimedOut { .. } => Some(SupervisorError::ReadinessTimeout {
                    url: url.clone(),
                    timeout_secs,
                    location: ErrorLocation::from(Location::caller()),
                }),
                ReadinessOutcome::Abandoned { error, .. } => {
                    Some(SupervisorError::ReadinessAbandoned {
                        url: url.clone(),
                        message: error.clone(),
                        location: ErrorLocation::from(Location::caller()),
                    })
                }
                _ => None,
            };

            if let Some(err) = failure
                && !quitting.load(Ordering::SeqCst)
            {
                error!("{err}");
                let window = state.lock().await.window.clone();
                if let Some(window) = window
                    && let Err(e) = ui.show_startup_failure(
                        &window,
                        &format!("{err}\n\nHint: {}", err.recovery_hint()),
                    )
                {
                    warn!("Failed to show startup failure: {e}");
                }
            }

            outcome
        });

        *self.readiness_task.lock().await = Some(watcher);
    }

    /// Hand the ready backend to the window. Returns true if it was displayed.
    ///
    /// The latch is read under the state lock: `shutdown` sets it before
    /// taking the lock, so a display can never follow a started shutdown.
    pub(crate) async fn display_when_ready(
        ui: &dyn UiLayer,
        state: &Mutex<SupervisorState>,
        quitting: &AtomicBool,
        ready: &AtomicBool,
        url: &str,
    ) -> bool {
        let state = state.lock().await;
        if quitting.load(Ordering::SeqCst) {
            debug!("Backend ready during shutdown, not displaying");
            return false;
        }
        ready.store(true, Ordering::SeqCst);

        let Some(window) = &state.window else {
            info!("Backend ready but no window open");
            return false;
        };

        info!("Displaying {url}");
        match ui.display_url(window, url) {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to display {url}: {e}");
                false
            }
        }
    }

    /// Wait for the readiness poll started by [`start`](Self::start) to end.
    ///
    /// Returns None if no poll was started or its outcome was already taken.
    pub async fn readiness_outcome(&self) -> Option<ReadinessOutcome> {
        let task = self.readiness_task.lock().await.take()?;
        task.await.ok()
    }

    /// Route a UI-layer trigger. Returns true if it started the shutdown.
    pub async fn handle_event(&self, event: LifecycleEvent) -> bool {
        debug!("Lifecycle event: {event:?}");
        match event {
            LifecycleEvent::WindowAllClosed => {
                self.state.lock().await.window = None;
                if !self.platform.quits_when_windows_closed() {
                    info!("All windows closed, staying resident on {}", self.platform);
                    return false;
                }
                self.shutdown().await
            }
            LifecycleEvent::QuitRequested
            | LifecycleEvent::BeforeQuit
            | LifecycleEvent::Signal => self.shutdown().await,
            LifecycleEvent::Activate => {
                self.reopen_window().await;
                false
            }
        }
    }

    /// Route a command from the UI command channel.
    pub async fn handle_command(&self, command: UiCommand) -> bool {
        match command {
            UiCommand::QuitApp => self.handle_event(LifecycleEvent::QuitRequested).await,
        }
    }

    async fn reopen_window(&self) {
        if self.phase() != SupervisorPhase::Running || self.is_quitting() {
            return;
        }

        let mut state = self.state.lock().await;
        if state.window.is_some() {
            return;
        }

        let window = match self.ui.create_window() {
            Ok(window) => window,
            Err(e) => {
                error!("Failed to recreate window: {e}");
                return;
            }
        };

        if self.is_backend_ready()
            && let Err(e) = self.ui.display_url(&window, &self.config.backend_url())
        {
            error!("Failed to display backend in new window: {e}");
        }
        state.window = Some(window);
    }

    /// Stop both children and destroy the window.
    ///
    /// Runs at most once per supervisor; every later call is a no-op that
    /// returns false.
    pub async fn shutdown(&self) -> bool {
        if self
            .quit_in_progress
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Shutdown already in progress");
            return false;
        }

        info!("Shutting down backend");
        self.cancel.cancel();
        let _ = self.phase_tx.send(SupervisorPhase::ShuttingDown);

        let window = {
            let mut state = self.state.lock().await;
            let report = self
                .coordinator
                .terminate_all(state.handles_mut(), self.platform)
                .await;
            if !report.all_confirmed() {
                warn!("Not every backend process confirmed exit");
            }
            state.last_termination = Some(report);
            state.window.take()
        };

        if let Some(window) = window
            && let Err(e) = self.ui.destroy_window(&window)
        {
            warn!("Failed to destroy window: {e}");
        }

        let _ = self.phase_tx.send(SupervisorPhase::Terminated);
        info!("Backend stopped");
        true
    }

    /// Report of the shutdown run, once it has happened.
    pub async fn termination_report(&self) -> Option<TerminationReport> {
        self.state.lock().await.last_termination.clone()
    }

    /// Each tracked child's role, PID and last recorded state.
    pub async fn process_states(&self) -> Vec<(ProcessRole, u32, ProcessState)> {
        let mut state = self.state.lock().await;
        state
            .handles_mut()
            .into_iter()
            .map(|handle| (handle.role(), handle.id(), handle.state()))
            .collect()
    }

    /// Probe the OS for each tracked child and record exits.
    pub async fn refresh_process_states(&self) -> Vec<(ProcessRole, u32, ProcessState)> {
        let mut state = self.state.lock().await;
        state
            .handles_mut()
            .into_iter()
            .map(|handle| {
                handle.is_alive();
                (handle.role(), handle.id(), handle.state())
            })
            .collect()
    }

    /// Compare-and-set on the phase. Returns true if the transition happened.
    fn advance(&self, from: SupervisorPhase, to: SupervisorPhase) -> bool {
        self.phase_tx.send_if_modified(|phase| {
            if *phase == from {
                *phase = to;
                true
            } else {
                false
            }
        })
    }
}

impl std::fmt::Debug for Supervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Supervisor")
            .field("platform", &self.platform)
            .field("phase", &self.phase())
            .field("quit_in_progress", &self.is_quitting())
            .finish_non_exhaustive()
    }
}
