mod lifecycle_event;
mod supervisor;
mod supervisor_phase;
mod supervisor_state;
mod ui_layer;

pub use lifecycle_event::LifecycleEvent;
pub use supervisor::Supervisor;
pub use supervisor_phase::SupervisorPhase;
pub use supervisor_state::SupervisorState;
pub use ui_layer::{UiLayer, WindowRef};
