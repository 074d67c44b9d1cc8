use bonsai_supervisor::{LauncherConfig, executable_name};

use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use tempfile::TempDir;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Fake backend: shell-script server and daemon on disk plus an HTTP mock
/// standing in for the server's listener.
pub struct TestBackend {
    pub bin_dir: TempDir,
    pub http: MockServer,
}

impl TestBackend {
    /// Both executables block until interrupted; the mock answers 200.
    pub async fn start() -> Self {
        Self::with_script("exec sleep 30").await
    }

    /// Both executables run `body`; the mock answers 200.
    pub async fn with_script(body: &str) -> Self {
        let bin_dir = tempfile::tempdir().unwrap();
        write_script(bin_dir.path(), "bonsai_dca_server", body);
        write_script(bin_dir.path(), "bonsai_dca_daemon", body);

        let http = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&http)
            .await;

        Self { bin_dir, http }
    }

    /// Config pointing the supervisor at this backend.
    pub fn config(&self) -> LauncherConfig {
        let mut config = LauncherConfig::default();
        config.backend.port = self.http.address().port();
        config.backend.binaries_dir = Some(self.bin_dir.path().to_string_lossy().into_owned());
        config.readiness.initial_backoff_ms = 10;
        config.readiness.max_backoff_ms = 50;
        config.readiness.startup_timeout_secs = 10;
        config.shutdown.exit_grace_ms = 2000;
        config
    }
}

pub fn write_script(dir: &Path, base: &str, body: &str) {
    let path = dir.join(executable_name(base));
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
}
