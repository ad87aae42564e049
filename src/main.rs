//! jobfit - Resume to Job Matcher
//!
//! Terminal front end for a resume-matching backend. Reads configuration
//! from the environment, logs to a file, and runs the form until the user
//! quits.

use std::fs::File;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing_subscriber::EnvFilter;

use jobfit::application::{App, AppMode, PendingRequest, RequestWorker};
use jobfit::infrastructure::{Config, HttpMatcherApi};
use jobfit::presentation::{render_ui, InputHandler};

/// How long to wait for input before checking for finished requests.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Entry point for the jobfit terminal application.
///
/// Loads configuration, sets up file logging and the terminal, and runs the
/// event loop until the user quits.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the log file cannot be
/// created, or terminal setup fails.
fn main() -> Result<()> {
    let config = Config::from_env()?;
    init_tracing(&config)?;
    tracing::info!(api_url = %config.api_url, "starting jobfit");

    let api = HttpMatcherApi::new(config.api_url.clone());
    let worker = RequestWorker::new(Arc::new(api));
    let mut app = App::new(config.download_dir.clone());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, &worker);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = %err, "terminal error");
        println!("{err:?}");
    }
    tracing::info!("exiting");

    Ok(())
}

/// Sends log output to the configured file; the terminal is owned by the UI.
fn init_tracing(config: &Config) -> Result<()> {
    let file = File::create(&config.log_file)
        .with_context(|| format!("could not create log file {}", config.log_file.display()))?;
    let filter = EnvFilter::try_new(&config.log_filter)
        .with_context(|| format!("JOBFIT_LOG '{}' is not a valid filter", config.log_filter))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Main application event loop.
///
/// Redraws the form, applies finished requests, and routes keyboard and
/// paste events to the input handler. Requests returned by the handler
/// are handed to the worker.
///
/// # Errors
///
/// Returns an IO error if terminal operations fail.
fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    worker: &RequestWorker,
) -> io::Result<()> {
    loop {
        while let Some(outcome) = worker.try_recv() {
            app.apply_outcome(outcome);
        }

        terminal.draw(|f| render_ui(f, app))?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if key.code == KeyCode::Char('q') && app.mode == AppMode::Normal {
                    return Ok(());
                }
                if let Some(request) = InputHandler::handle_key_event(app, key.code, key.modifiers) {
                    submit(app, worker, request);
                }
            }
            Event::Paste(text) => InputHandler::handle_paste(app, &text),
            _ => {}
        }
    }
}

fn submit(app: &mut App, worker: &RequestWorker, request: PendingRequest) {
    let operation = request.operation();
    if let Err(err) = worker.submit(request) {
        tracing::error!(?operation, error = %err, "could not start request");
        app.fail_request(operation, err);
    }
}
