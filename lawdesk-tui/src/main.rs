//! lawdesk TUI entry point.

use crossterm::{
    event::{self, Event as CrosstermEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use lawdesk_tui::api_client::{CollectionApi, RestClient};
use lawdesk_tui::auth::AuthContext;
use lawdesk_tui::config::TuiConfig;
use lawdesk_tui::error::TuiError;
use lawdesk_tui::events::TuiEvent;
use lawdesk_tui::logging::init_logging;
use lawdesk_tui::persistence;
use lawdesk_tui::state::App;
use lawdesk_tui::tasks::{dispatch, Flow};
use lawdesk_tui::views::render_view;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let config = TuiConfig::load()?;
    init_logging(&config)?;
    let auth = AuthContext::from_config(&config.auth)?;
    tracing::info!(authenticated = auth.is_authenticated(), "Starting lawdesk TUI");
    let api: Arc<dyn CollectionApi> = Arc::new(RestClient::new(&config, &auth)?);

    let mut app = App::new(config);
    match persistence::load(&app.config.persistence_path) {
        Ok(Some(state)) => app.restore(state),
        Ok(None) => {}
        Err(err) => tracing::warn!(error = %err, "Ignoring unreadable UI state"),
    }

    let mut terminal = setup_terminal()?;
    let _guard = TerminalGuard;

    let (event_tx, mut event_rx) = mpsc::channel::<TuiEvent>(256);
    spawn_input_reader(event_tx.clone());

    for command in app.start() {
        dispatch(&api, command, &event_tx);
    }

    let tick_rate = Duration::from_millis(app.config.refresh_interval_ms);
    let mut ticker = tokio::time::interval(tick_rate);

    'running: loop {
        terminal.draw(|f| render_view(f, &app))?;

        let commands = tokio::select! {
            _ = ticker.tick() => app.on_tick(Instant::now()),
            Some(event) = event_rx.recv() => app.apply_event(event),
        };
        for command in commands {
            if dispatch(&api, command, &event_tx) == Flow::Quit {
                break 'running;
            }
        }
    }

    if let Err(err) = persistence::save(&app.config.persistence_path, &app.persisted()) {
        tracing::warn!(error = %err, "Failed to save UI state");
    }
    tracing::info!("Exiting lawdesk TUI");
    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, TuiError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen);
    }
}

fn spawn_input_reader(sender: mpsc::Sender<TuiEvent>) {
    std::thread::spawn(move || loop {
        if let Ok(true) = event::poll(Duration::from_millis(200)) {
            if let Ok(evt) = event::read() {
                let sent = match evt {
                    CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                        sender.blocking_send(TuiEvent::Input(key))
                    }
                    CrosstermEvent::Resize(width, height) => {
                        sender.blocking_send(TuiEvent::Resize { width, height })
                    }
                    _ => Ok(()),
                };
                if sent.is_err() {
                    break;
                }
            }
        }
    });
}
