//! Tauri IPC commands for frontend communication.

use bonsai_supervisor::{Supervisor, UiCommand};

use std::sync::Arc;

use tauri::State;
use tracing::info;

/// Command channel from the page: `invoke('send_command', { command: { message: 'quit-app' } })`.
///
/// Unknown messages are rejected during deserialisation, before this runs.
#[tauri::command]
pub async fn send_command(
    app: tauri::AppHandle,
    supervisor: State<'_, Arc<Supervisor>>,
    command: UiCommand,
) -> Result<(), String> {
    info!("UI command received: {command:?}");

    match command {
        UiCommand::QuitApp => {
            supervisor.handle_command(command).await;
            app.exit(0);
        }
    }

    Ok(())
}
