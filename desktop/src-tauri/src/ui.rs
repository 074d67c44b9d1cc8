//! Tauri implementation of the supervisor's UI layer.

use bonsai_supervisor::{SupervisorError, SupervisorResult, UiLayer, WindowRef};

use std::fmt::Display;
use std::panic::Location;
use std::path::PathBuf;

use error_location::ErrorLocation;
use tauri::{AppHandle, Manager, Url, WebviewUrl, WebviewWindow, WebviewWindowBuilder};
use tauri_plugin_shell::ShellExt;
use tracing::{info, warn};

const STARTING_PAGE: &str = "index.html";
const WINDOW_TITLE: &str = "Bonsai DCA";
const WINDOW_SIZE: (f64, f64) = (1280.0, 800.0);
const WINDOW_MIN_SIZE: (f64, f64) = (800.0, 600.0);

/// Host the bundled pages are served from on Windows and Android.
const TAURI_LOCAL_HOST: &str = "tauri.localhost";

/// Drives the single main webview window.
pub struct TauriUi {
    app: AppHandle,
    backend_url: String,
    log_path: PathBuf,
}

impl TauriUi {
    pub fn new(app: AppHandle, backend_url: String, log_path: PathBuf) -> Self {
        Self {
            app,
            backend_url,
            log_path,
        }
    }

    fn webview(&self, window: &WindowRef) -> SupervisorResult<WebviewWindow> {
        self.app
            .get_webview_window(window.label())
            .ok_or_else(|| window_error(format!("window '{}' is gone", window.label())))
    }
}

impl UiLayer for TauriUi {
    fn create_window(&self) -> SupervisorResult<WindowRef> {
        let window = WindowRef::main();

        if let Some(existing) = self.app.get_webview_window(window.label()) {
            existing.show().map_err(window_error)?;
            existing.set_focus().map_err(window_error)?;
            return Ok(window);
        }

        let app = self.app.clone();
        let backend_url = self.backend_url.clone();

        WebviewWindowBuilder::new(
            &self.app,
            window.label(),
            WebviewUrl::App(STARTING_PAGE.into()),
        )
        .title(WINDOW_TITLE)
        .inner_size(WINDOW_SIZE.0, WINDOW_SIZE.1)
        .min_inner_size(WINDOW_MIN_SIZE.0, WINDOW_MIN_SIZE.1)
        .on_navigation(move |url| {
            if !is_external(url, &backend_url) {
                return true;
            }
            open_external(&app, url);
            false
        })
        .build()
        .map_err(window_error)?;

        Ok(window)
    }

    fn display_url(&self, window: &WindowRef, url: &str) -> SupervisorResult<()> {
        let target: Url = url.parse().map_err(window_error)?;
        self.webview(window)?
            .navigate(target)
            .map_err(window_error)
    }

    fn show_startup_failure(&self, window: &WindowRef, message: &str) -> SupervisorResult<()> {
        let text = format!("{message}\n\nLogs: {}", self.log_path.display());
        let script = failure_script(&text)?;
        self.webview(window)?.eval(&script).map_err(window_error)
    }

    fn destroy_window(&self, window: &WindowRef) -> SupervisorResult<()> {
        match self.app.get_webview_window(window.label()) {
            Some(webview) => webview.destroy().map_err(window_error),
            None => Ok(()),
        }
    }
}

/// Whether a navigation leaves both the bundled pages and the backend.
pub fn is_external(url: &Url, backend_url: &str) -> bool {
    if !matches!(url.scheme(), "http" | "https") {
        return false;
    }
    if url.host_str() == Some(TAURI_LOCAL_HOST) {
        return false;
    }

    match Url::parse(backend_url) {
        Ok(backend) => {
            canonical_host(url) != canonical_host(&backend)
                || url.port_or_known_default() != backend.port_or_known_default()
        }
        Err(_) => true,
    }
}

/// Host name with every loopback alias folded into one.
fn canonical_host(url: &Url) -> Option<&str> {
    match url.host_str()? {
        "localhost" | "127.0.0.1" | "[::1]" => Some("127.0.0.1"),
        host => Some(host),
    }
}

/// Script that renders `message` into the starting page, or replaces the
/// document body if some other page is loaded.
pub fn failure_script(message: &str) -> SupervisorResult<String> {
    let literal = serde_json::to_string(message).map_err(window_error)?;
    Ok(format!(
        "(function (text) {{ \
           if (typeof window.showStartupFailure === 'function') {{ window.showStartupFailure(text); }} \
           else {{ document.body.innerText = text; }} \
         }})({literal});"
    ))
}

#[allow(deprecated)]
fn open_external(app: &AppHandle, url: &Url) {
    info!("Opening {url} in the system browser");
    if let Err(e) = app.shell().open(url.as_str(), None) {
        warn!("Failed to open {url}: {e}");
    }
}

#[track_caller]
fn window_error(e: impl Display) -> SupervisorError {
    SupervisorError::Window {
        message: e.to_string(),
        location: ErrorLocation::from(Location::caller()),
    }
}
