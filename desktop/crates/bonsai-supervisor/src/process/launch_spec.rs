use crate::process::ProcessRole;

use std::path::PathBuf;

/// Everything needed to start one child process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    pub role: ProcessRole,
    pub executable_path: PathBuf,
    pub args: Vec<String>,
}

impl LaunchSpec {
    pub fn new(role: ProcessRole, executable_path: impl Into<PathBuf>) -> Self {
        Self {
            role,
            executable_path: executable_path.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Label used in logs and for kill-by-image-name: the file stem.
    pub fn label(&self) -> String {
        self.executable_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.role.to_string())
    }
}
