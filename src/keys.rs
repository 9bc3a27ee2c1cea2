use crate::app::App;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyEvent, KeyModifiers};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, watch};

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    frame_interval: &watch::Sender<Duration>,
) {
    let mut guard = app.lock().await;

    match (key_event.code, key_event.modifiers) {
        (Char('q'), _) | (Char('c'), KeyModifiers::CONTROL) => {
            guard.plugin.cleanup();
            crate::cleanup_terminal();
            std::process::exit(0);
        }
        (Char('l'), _) => guard.toggle_show_logs(),
        (Char('f'), _) => guard.toggle_full_screen(),
        (Char('c'), _) => {
            guard.reload_config();
            frame_interval.send_replace(guard.frame_interval());
        }
        _ => {}
    }
}
