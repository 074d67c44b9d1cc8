#![allow(dead_code)]

pub(crate) mod recording_ui;
pub(crate) mod test_backend;

pub use recording_ui::*;
pub use test_backend::*;
