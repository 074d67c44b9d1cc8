//! Resolve backend executables on disk.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

/// Append the platform executable suffix (`.exe` on Windows).
pub fn executable_name(base: &str) -> String {
    let suffix = std::env::consts::EXE_SUFFIX;
    if suffix.is_empty() || base.ends_with(suffix) {
        base.to_string()
    } else {
        format!("{base}{suffix}")
    }
}

/// Finds backend executables across the places a build may put them.
///
/// Search order:
/// 1. Configured binaries directory
/// 2. Sibling to the current executable (bundled builds)
/// 3. Bundled resources directory
/// 4. Development layout `../python/dist` relative to the working directory
#[derive(Debug, Clone, Default)]
pub struct BinaryLocator {
    search_dirs: Vec<PathBuf>,
}

impl BinaryLocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Standard search path, with optional configured and resource directories.
    pub fn standard(configured: Option<&Path>, resource_dir: Option<&Path>) -> Self {
        let mut locator = Self::new();

        if let Some(dir) = configured {
            locator = locator.with_dir(dir);
        }

        if let Ok(exe) = std::env::current_exe()
            && let Some(exe_dir) = exe.parent()
        {
            locator = locator.with_dir(exe_dir);
        }

        if let Some(dir) = resource_dir {
            locator = locator.with_dir(dir);
        }

        locator.with_dir(Path::new("..").join("python").join("dist"))
    }

    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.search_dirs.push(dir.into());
        self
    }

    pub fn search_dirs(&self) -> &[PathBuf] {
        &self.search_dirs
    }

    /// Resolve `base` to a path.
    ///
    /// Returns the first existing candidate. When nothing exists the first
    /// candidate is returned anyway so the spawn reports a precise
    /// `BinaryNotFound`.
    pub fn resolve(&self, base: &str) -> PathBuf {
        let name = executable_name(base);

        for dir in &self.search_dirs {
            let candidate = dir.join(&name);
            if candidate.is_file() {
                info!("Using {name} at {}", candidate.display());
                return candidate;
            }
            debug!("{name} not found in {}", dir.display());
        }

        let fallback = self
            .search_dirs
            .first()
            .map(|dir| dir.join(&name))
            .unwrap_or_else(|| PathBuf::from(&name));
        warn!("{name} not found in any search directory, trying {}", fallback.display());
        fallback
    }
}
