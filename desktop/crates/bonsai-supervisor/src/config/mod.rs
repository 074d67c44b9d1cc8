mod backend_settings;
mod launcher_config;
mod logging_settings;
mod readiness_settings;
mod shutdown_settings;

pub use backend_settings::BackendSettings;
pub use launcher_config::{
    CONFIG_FILENAME, CONFIG_VERSION, DEFAULT_HOST, DEFAULT_PORT, LauncherConfig,
};
pub use logging_settings::LoggingSettings;
pub use readiness_settings::ReadinessSettings;
pub use shutdown_settings::ShutdownSettings;

pub(crate) use launcher_config::{
    default_daemon_executable, default_exit_grace, default_host, default_initial_backoff,
    default_log_level, default_log_retention, default_max_backoff, default_port,
    default_request_timeout, default_server_executable, default_startup_timeout,
};
