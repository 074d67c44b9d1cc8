use bonsai_supervisor::{SupervisorResult, UiLayer, WindowRef};

use std::sync::Mutex;

/// UI layer that only remembers what it was asked to do.
#[derive(Default)]
pub struct RecordingUi {
    displayed: Mutex<Vec<String>>,
    failures: Mutex<Vec<String>>,
    destroyed: Mutex<Vec<WindowRef>>,
}

impl RecordingUi {
    pub fn displayed(&self) -> Vec<String> {
        self.displayed.lock().unwrap().clone()
    }

    pub fn failures(&self) -> Vec<String> {
        self.failures.lock().unwrap().clone()
    }

    pub fn destroyed(&self) -> usize {
        self.destroyed.lock().unwrap().len()
    }
}

impl UiLayer for RecordingUi {
    fn create_window(&self) -> SupervisorResult<WindowRef> {
        Ok(WindowRef::main())
    }

    fn display_url(&self, _window: &WindowRef, url: &str) -> SupervisorResult<()> {
        self.displayed.lock().unwrap().push(url.to_string());
        Ok(())
    }

    fn show_startup_failure(&self, _window: &WindowRef, message: &str) -> SupervisorResult<()> {
        self.failures.lock().unwrap().push(message.to_string());
        Ok(())
    }

    fn destroy_window(&self, window: &WindowRef) -> SupervisorResult<()> {
        self.destroyed.lock().unwrap().push(window.clone());
        Ok(())
    }
}
