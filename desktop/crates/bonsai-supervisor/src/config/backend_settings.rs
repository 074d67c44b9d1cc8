use crate::config::{default_daemon_executable, default_host, default_port, default_server_executable};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendSettings {
    /// Host the backend listens on (loopback only)
    #[serde(default = "default_host")]
    pub host: String,

    /// Port the backend listens on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Server executable base name, without platform suffix
    #[serde(default = "default_server_executable")]
    pub server_executable: String,

    /// Daemon executable base name, without platform suffix
    #[serde(default = "default_daemon_executable")]
    pub daemon_executable: String,

    /// Directory searched first for the executables
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binaries_dir: Option<String>,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            server_executable: default_server_executable(),
            daemon_executable: default_daemon_executable(),
            binaries_dir: None,
        }
    }
}
