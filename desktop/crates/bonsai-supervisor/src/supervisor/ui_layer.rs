use crate::SupervisorResult;

/// Weak reference to a window owned by the UI layer.
///
/// Only the label is held; the window itself may already be gone, in which
/// case UI operations on it are expected to fail or no-op.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WindowRef(String);

impl WindowRef {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// The single main window.
    pub fn main() -> Self {
        Self::new("main")
    }

    pub fn label(&self) -> &str {
        &self.0
    }
}

/// The platform glue the supervisor drives.
pub trait UiLayer: Send + Sync {
    /// Create the main window showing a placeholder until the backend is ready.
    fn create_window(&self) -> SupervisorResult<WindowRef>;

    /// Point the window at the backend.
    fn display_url(&self, window: &WindowRef, url: &str) -> SupervisorResult<()>;

    /// Tell the user the backend could not be brought up.
    fn show_startup_failure(&self, window: &WindowRef, message: &str) -> SupervisorResult<()>;

    fn destroy_window(&self, window: &WindowRef) -> SupervisorResult<()>;
}
