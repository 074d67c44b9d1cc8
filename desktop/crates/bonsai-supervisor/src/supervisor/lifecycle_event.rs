/// Triggers the UI layer forwards to the supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// The last window was closed
    WindowAllClosed,
    /// Explicit quit from the UI command channel
    QuitRequested,
    /// The application is about to exit
    BeforeQuit,
    /// The launcher received SIGINT/SIGTERM
    Signal,
    /// The application was re-activated (macOS dock click)
    Activate,
}
