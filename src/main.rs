//! Primera Página
//!
//! A terminal application with three views: a registration form whose users
//! are persisted locally, a directory of users fetched from a REST API, and a
//! static message page.

use std::io;
use std::sync::Arc;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tokio::sync::mpsc;

use primera_pagina::application::{self, App, AppMode, FetchCompletion, Registry};
use primera_pagina::infrastructure::{init_tracing, Config, DirectorySource, FileStore, HttpDirectory};
use primera_pagina::presentation::{render_ui, InputHandler};

/// Entry point for the application.
///
/// Loads the configuration, sets up logging and the terminal, then runs the
/// event loop on a single-threaded runtime until the user quits.
///
/// # Errors
///
/// Returns an error if the configuration is malformed, the HTTP client cannot
/// be built, or terminal setup fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load(&Config::default_path())?;
    init_tracing(&config.log_path())?;
    tracing::info!(api = %config.api_base_url, storage = %config.storage_path.display(), "starting");

    let source: Arc<dyn DirectorySource> =
        Arc::new(HttpDirectory::new(&config.api_base_url, config.request_timeout())?);
    let registry = Registry::open(Box::new(FileStore::open(&config.storage_path)));
    let mut app = App::new(registry, config.message.clone());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, source).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = %err, "event loop failed");
        eprintln!("{err:?}");
    }

    tracing::info!("stopped");
    Ok(())
}

/// Main application event loop.
///
/// Waits on terminal input and finished fetches, redrawing after each.
/// Continues running until the user presses 'q' in normal mode or Ctrl+C.
async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    source: Arc<dyn DirectorySource>,
) -> io::Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<FetchCompletion>();
    let mut events = EventStream::new();

    loop {
        for (token, request) in app.take_pending_requests() {
            application::spawn_fetch(Arc::clone(&source), token, request, tx.clone());
        }

        terminal.draw(|f| render_ui(f, app))?;

        tokio::select! {
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    let quit = match key.code {
                        KeyCode::Char('q') => app.mode == AppMode::Normal,
                        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
                        _ => false,
                    };
                    if quit {
                        return Ok(());
                    }
                    InputHandler::handle_key_event(app, key.code, key.modifiers);
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e),
                None => return Ok(()),
            },
            Some(completion) = rx.recv() => app.apply_fetch(completion),
        }
    }
}
