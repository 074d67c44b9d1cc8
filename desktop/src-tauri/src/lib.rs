mod commands;
mod logging;
mod ui;

use bonsai_supervisor::{
    BinaryLocator, LauncherConfig, LifecycleEvent, Supervisor, SupervisorPhase, SupervisorResult,
    WindowRef,
};
use logging::{current_log_path, setup_logging};
use ui::TauriUi;

#[cfg(test)]
mod tests;

use std::path::Path;
use std::sync::Arc;

use tauri::{AppHandle, Manager, RunEvent};
use tracing::{error, info, warn};

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tauri::Builder::default()
        .plugin(tauri_plugin_shell::init())
        .plugin(tauri_plugin_single_instance::init(|app, _argv, _cwd| {
            // Focus existing window on second instance attempt
            if let Some(window) = app.get_webview_window(WindowRef::main().label()) {
                window.show().ok();
                window.set_focus().ok();
            }
        }))
        .setup(|app| {
            let data_dir = app.path().app_data_dir()?;
            std::fs::create_dir_all(&data_dir)?;

            // Logging needs the configured level, so a broken config is only
            // reported once the subscriber is up
            let (config, config_error) = match LauncherConfig::load_or_create(&data_dir) {
                Ok(config) => (config, None),
                Err(e) => (LauncherConfig::default(), Some(e)),
            };

            setup_logging(&data_dir, &config.logging)?;

            info!("Starting Bonsai DCA v{}", env!("CARGO_PKG_VERSION"));
            info!("Data directory: {}", data_dir.display());
            if let Some(e) = config_error {
                warn!("Using default config: {e}");
                warn!("Hint: {}", e.recovery_hint());
            }

            let supervisor = Arc::new(build_supervisor(app.handle(), &data_dir, config)?);
            app.manage(supervisor.clone());

            // Setup signal handlers for graceful shutdown on Unix
            #[cfg(unix)]
            spawn_signal_watcher(app.handle().clone(), supervisor);

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![commands::send_command])
        .build(tauri::generate_context!())
        .expect("error while building tauri application")
        .run(handle_run_event);
}

fn build_supervisor(
    app: &AppHandle,
    data_dir: &Path,
    config: LauncherConfig,
) -> SupervisorResult<Supervisor> {
    let resource_dir = app.path().resource_dir().ok();
    let locator = BinaryLocator::standard(
        config.backend.binaries_dir.as_deref().map(Path::new),
        resource_dir.as_deref(),
    );
    info!("Backend search path: {:?}", locator.search_dirs());

    let ui = Arc::new(TauriUi::new(
        app.clone(),
        config.backend_url(),
        current_log_path(data_dir),
    ));

    Ok(Supervisor::new(config, ui)?.with_locator(locator))
}

fn handle_run_event(app: &AppHandle, event: RunEvent) {
    let Some(supervisor) = app.try_state::<Arc<Supervisor>>() else {
        return;
    };
    let supervisor = supervisor.inner().clone();

    match event {
        RunEvent::Ready => {
            tauri::async_runtime::spawn(async move {
                if let Err(e) = supervisor.start().await {
                    error!("Failed to start backend: {e}");
                }
            });
        }
        RunEvent::ExitRequested { api, code, .. } => {
            if !holds_exit(supervisor.phase()) {
                return;
            }
            info!("Exit requested (code: {code:?})");

            // Teardown waits on child exits; run it off the event loop and
            // exit again once it is done
            api.prevent_exit();
            let app = app.clone();
            tauri::async_runtime::spawn(async move {
                if supervisor.handle_event(exit_event(code)).await {
                    app.exit(code.unwrap_or(0));
                }
            });
        }
        RunEvent::Exit => {
            tauri::async_runtime::block_on(supervisor.handle_event(LifecycleEvent::BeforeQuit));
        }
        #[cfg(target_os = "macos")]
        RunEvent::Reopen {
            has_visible_windows,
            ..
        } => {
            if !has_visible_windows {
                tauri::async_runtime::spawn(async move {
                    supervisor.handle_event(LifecycleEvent::Activate).await;
                });
            }
        }
        _ => {}
    }
}

/// Exit requests without a code come from the last window closing;
/// an explicit code means something asked the app to quit.
pub(crate) fn exit_event(code: Option<i32>) -> LifecycleEvent {
    match code {
        None => LifecycleEvent::WindowAllClosed,
        Some(_) => LifecycleEvent::BeforeQuit,
    }
}

/// Exit requests are held back until the backend has been torn down.
pub(crate) fn holds_exit(phase: SupervisorPhase) -> bool {
    phase != SupervisorPhase::Terminated
}

#[cfg(unix)]
fn spawn_signal_watcher(app: AppHandle, supervisor: Arc<Supervisor>) {
    std::thread::spawn(move || {
        use signal_hook::consts::{SIGINT, SIGTERM};
        use signal_hook::iterator::Signals;

        let mut signals = match Signals::new([SIGINT, SIGTERM]) {
            Ok(s) => s,
            Err(e) => {
                error!("Failed to register signal handlers: {e}");
                return;
            }
        };

        if let Some(sig) = signals.forever().next() {
            info!("Received signal {sig}, shutting down...");
            tauri::async_runtime::block_on(supervisor.handle_event(LifecycleEvent::Signal));
            app.exit(0);
        }
    });
}
