mod app;
mod components;
mod draw;
mod keys;
mod plugin;
mod state;
mod ui;

use crate::app::App;
use crate::plugin::LeaderboardPlugin;
use crate::state::app_settings::AppSettings;
use crate::state::config::PluginConfig;
use crate::state::messages::UiEvent;
use crate::state::refresher::{AnimationClock, PeriodicRefresher};
use crossterm::event::{self as crossterm_event, Event};
use crossterm::{cursor, execute, terminal};
use pga_api::client::PgaApi;
use std::io::Stdout;
use std::sync::Arc;
use std::time::Duration;
use std::{io, panic};
use tokio::sync::{Mutex, mpsc, watch};
use tui::{Terminal, backend::CrosstermBackend};

enum Mode {
    Interactive,
    Once,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let Some(mode) = handle_cli_args() else {
        return Ok(());
    };

    better_panic::install();

    if let Mode::Once = mode {
        return run_once().await;
    }

    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;

    setup_panic_hook();
    setup_terminal()?;

    tui_logger::init_logger(log::LevelFilter::Trace)?;
    tui_logger::set_default_level(log::LevelFilter::Info);

    let app = Arc::new(Mutex::new(App::new()));
    let frame_interval = app.lock().await.frame_interval();

    let (ui_event_tx, ui_event_rx) = mpsc::channel::<UiEvent>(100);
    let (frame_interval_tx, frame_interval_rx) = watch::channel::<Duration>(frame_interval);

    // Input handler thread
    let input_handler = tokio::spawn(input_handler_task(ui_event_tx.clone()));

    // Update tick thread (every 5s; the plugin throttles actual fetches)
    let periodic_updater = PeriodicRefresher::new(ui_event_tx.clone());
    let periodic_task = tokio::spawn(periodic_updater.run());

    // Ticker animation at the configured frame rate
    let animation_clock = AnimationClock::new(ui_event_tx.clone(), frame_interval_rx);
    let animation_task = tokio::spawn(animation_clock.run());

    let _ = ui_event_tx.send(UiEvent::AppStarted).await;

    main_ui_loop(terminal, app, ui_event_rx, frame_interval_tx).await;

    input_handler.abort();
    periodic_task.abort();
    animation_task.abort();

    Ok(())
}

fn handle_cli_args() -> Option<Mode> {
    let mut args = std::env::args().skip(1);
    let Some(arg) = args.next() else {
        return Some(Mode::Interactive);
    };

    match arg.as_str() {
        "--once" => Some(Mode::Once),
        "-h" | "--help" => {
            println!("{}", usage_text());
            None
        }
        "-V" | "--version" => {
            println!("pgatui {}", env!("CARGO_PKG_VERSION"));
            None
        }
        _ => {
            eprintln!("Unknown argument: {arg}\n\n{}", usage_text());
            std::process::exit(2);
        }
    }
}

fn usage_text() -> &'static str {
    "pgatui - PGA Tour leaderboard for LED panels

Usage:
  pgatui            interactive panel preview
  pgatui --once     fetch once and print the panel rows
  pgatui --help
  pgatui --version

Keys:
  q  quit   l  logs   f  full screen   c  reload config

Environment:
  PGATUI_CONFIG   Path to a JSON plugin config file
  PGATUI_LOG      Log level (error, warn, info, debug, trace)"
}

async fn run_once() -> anyhow::Result<()> {
    let settings = AppSettings::load();
    let config = PluginConfig::load(settings.config_path.as_deref());
    config.validate()?;

    let mut plugin = LeaderboardPlugin::new(PgaApi::with_base_url(&config.api_base_url), config);
    plugin.update().await;
    for text in plugin.display().texts() {
        println!("{text}");
    }
    plugin.cleanup();
    Ok(())
}

async fn main_ui_loop(
    mut terminal: Terminal<CrosstermBackend<Stdout>>,
    app: Arc<Mutex<App>>,
    mut ui_events: mpsc::Receiver<UiEvent>,
    frame_interval: watch::Sender<Duration>,
) {
    while let Some(ui_event) = ui_events.recv().await {
        let should_redraw = handle_ui_event(ui_event, &app, &frame_interval).await;
        if should_redraw {
            let mut app_guard = app.lock().await;
            draw::draw(&mut terminal, &mut app_guard);
        }
    }
}

async fn handle_ui_event(
    ui_event: UiEvent,
    app: &Arc<Mutex<App>>,
    frame_interval: &watch::Sender<Duration>,
) -> bool {
    match ui_event {
        UiEvent::AppStarted | UiEvent::UpdateTick => {
            let mut guard = app.lock().await;
            guard.update().await;
            true
        }
        UiEvent::KeyPressed(key_event) => {
            keys::handle_key_bindings(key_event, app, frame_interval).await;
            true
        }
        UiEvent::Resize => true,
        UiEvent::AnimationTick => {
            let mut guard = app.lock().await;
            guard.advance_animation();
            true
        }
    }
}

async fn input_handler_task(ui_events: mpsc::Sender<UiEvent>) {
    loop {
        if let Ok(event) = crossterm_event::read() {
            let ui_event = match event {
                Event::Key(key_event) => Some(UiEvent::KeyPressed(key_event)),
                Event::Resize(_, _) => Some(UiEvent::Resize),
                _ => None,
            };

            if let Some(ui_event) = ui_event
                && ui_events.send(ui_event).await.is_err()
            {
                break;
            }
        }
    }
}

fn setup_terminal() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::Hide)?;
    execute!(stdout, terminal::EnterAlternateScreen)?;
    execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
    terminal::enable_raw_mode()
}

pub fn cleanup_terminal() {
    let mut stdout = io::stdout();
    let _ = execute!(stdout, cursor::MoveTo(0, 0));
    let _ = execute!(stdout, terminal::Clear(terminal::ClearType::All));
    let _ = execute!(stdout, terminal::LeaveAlternateScreen);
    let _ = execute!(stdout, cursor::Show);
    let _ = terminal::disable_raw_mode();
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        if plugin::poll_in_flight() {
            return;
        }
        cleanup_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}
