//! lrm - live-reload monitor
//!
//! Connects to a dev server's live-reload socket, shows the connection
//! status, and "reloads the page" whenever the server sends `reload`.
//!
//! # Usage
//!
//! ```text
//! lrm                                  # TUI, default endpoint ws://localhost:3000/ws
//! lrm --endpoint ws://127.0.0.1:8080/ws
//! lrm --exec 'make preview'            # run a command on every reload
//! lrm --plain                          # print status lines instead of the TUI
//! ```

use std::fs::{self, OpenOptions};
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event as CrosstermEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use lrm_protocol::Endpoint;
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use lrm_tui::app::App;
use lrm_tui::config::Settings;
use lrm_tui::error::{Result as TuiResult, TuiError};
use lrm_tui::host::{spawn_reload_command, ChannelHost, PlainHost};
use lrm_tui::input::{handle_key_event, Action, Event};
use lrm_tui::monitor::{ConnectionMonitor, MonitorConfig};
use lrm_tui::transport::WsTransport;
use lrm_tui::ui;

// ============================================================================
// CLI Arguments
// ============================================================================

/// lrm - live-reload monitor for dev servers
#[derive(Parser, Debug)]
#[command(name = "lrm")]
#[command(about = "Watch a live-reload socket and reload on signal")]
#[command(version)]
struct Args {
    /// WebSocket endpoint of the dev server
    #[arg(long, short = 'e')]
    endpoint: Option<Endpoint>,

    /// Delay before reconnecting after an unexpected close, in milliseconds
    #[arg(long)]
    reconnect_delay_ms: Option<u64>,

    /// Shell command to run on every reload
    #[arg(long, short = 'x')]
    exec: Option<String>,

    /// Settings file (default: $XDG_CONFIG_HOME/lrm/config.toml)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Print status lines to stdout instead of running the TUI
    #[arg(long)]
    plain: bool,
}

impl Args {
    /// Settings given on the command line.
    fn overrides(&self) -> Settings {
        Settings {
            endpoint: self.endpoint.clone(),
            reconnect_delay_ms: self.reconnect_delay_ms,
            on_reload: self.exec.clone(),
        }
    }
}

// ============================================================================
// Terminal Setup / Cleanup
// ============================================================================

fn setup_terminal() -> TuiResult<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().map_err(|e| TuiError::TerminalInit(e.to_string()))?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).map_err(|e| TuiError::TerminalInit(e.to_string()))?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| TuiError::TerminalInit(e.to_string()))
}

fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> TuiResult<()> {
    disable_raw_mode().map_err(|e| TuiError::TerminalCleanup(e.to_string()))?;

    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .map_err(|e| TuiError::TerminalCleanup(e.to_string()))?;

    terminal
        .show_cursor()
        .map_err(|e| TuiError::TerminalCleanup(e.to_string()))?;

    Ok(())
}

// ============================================================================
// Keyboard Input Task
// ============================================================================

/// Spawns a task that polls for keyboard input and sends events to the channel.
fn spawn_keyboard_task(
    event_tx: mpsc::UnboundedSender<Event>,
    cancel_token: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if cancel_token.is_cancelled() {
                debug!("Keyboard task shutting down");
                break;
            }

            // crossterm polling is synchronous
            let poll_result = tokio::task::spawn_blocking(|| {
                if event::poll(Duration::from_millis(50)).unwrap_or(false) {
                    event::read().ok()
                } else {
                    None
                }
            })
            .await;

            match poll_result {
                Ok(Some(CrosstermEvent::Key(key))) => {
                    if event_tx.send(Event::Key(key)).is_err() {
                        debug!("Event channel closed, keyboard task exiting");
                        break;
                    }
                }
                Ok(Some(CrosstermEvent::Resize(width, height))) => {
                    if event_tx.send(Event::Resize(width, height)).is_err() {
                        break;
                    }
                }
                Ok(Some(_)) | Ok(None) => {}
                Err(e) => {
                    error!(error = %e, "Keyboard polling task panicked");
                    break;
                }
            }
        }
    })
}

// ============================================================================
// Main Event Loop
// ============================================================================

/// Runs the main TUI event loop until the user quits.
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    event_rx: &mut mpsc::UnboundedReceiver<Event>,
    on_reload: Option<&str>,
    cancel_token: &CancellationToken,
) -> Result<()> {
    // Tick interval for periodic UI refresh
    let tick_rate = Duration::from_millis(250);

    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        match tokio::time::timeout(tick_rate, event_rx.recv()).await {
            Ok(Some(Event::Key(key))) => {
                if handle_key_event(key, app) == Action::Quit {
                    info!("User requested quit");
                    break;
                }
            }
            Ok(Some(Event::Resize(_width, _height))) => {
                // ratatui picks up the new size on the next draw
                debug!("Terminal resized");
            }
            Ok(Some(Event::Status(view))) => {
                app.apply_status(view);
            }
            Ok(Some(Event::Message(payload))) => {
                app.record_message(payload);
            }
            Ok(Some(Event::Reload)) => {
                app.record_reload();
                info!(reloads = app.reload_count, "Page reloaded");
                if let Some(command) = on_reload {
                    spawn_reload_command(command);
                }
            }
            Ok(None) => {
                warn!("Event channel closed");
                break;
            }
            Err(_) => {
                // Timeout, redraw
            }
        }

        if app.should_quit || cancel_token.is_cancelled() {
            break;
        }
    }

    cancel_token.cancel();
    Ok(())
}

// ============================================================================
// Logging Setup
// ============================================================================

/// Returns the path to the log file directory.
fn get_log_dir() -> Option<PathBuf> {
    dirs::state_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/state")))
        .map(|dir| dir.join("lrm"))
}

/// Creates the log file for TUI logging. Returns `None` if that fails.
fn create_log_file() -> Option<std::fs::File> {
    let log_dir = get_log_dir()?;

    if let Err(e) = fs::create_dir_all(&log_dir) {
        eprintln!("Warning: Failed to create log directory {log_dir:?}: {e}");
        return None;
    }

    let log_path = log_dir.join("lrm.log");

    match OpenOptions::new().create(true).append(true).open(&log_path) {
        Ok(file) => Some(file),
        Err(e) => {
            eprintln!("Warning: Failed to open log file {log_path:?}: {e}");
            None
        }
    }
}

fn default_filter() -> EnvFilter {
    EnvFilter::from_default_env().add_directive(
        "lrm=info"
            .parse()
            .unwrap_or_else(|_| tracing_subscriber::filter::Directive::from(tracing::Level::INFO)),
    )
}

/// Logs to a file in TUI mode, since stderr would corrupt the screen.
fn init_tui_logging() {
    if let Some(file) = create_log_file() {
        tracing_subscriber::fmt()
            .with_env_filter(default_filter())
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new("off"))
            .init();
    }
}

fn init_plain_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(default_filter())
        .with_writer(io::stderr)
        .init();
}

// ============================================================================
// Modes
// ============================================================================

/// Runs the monitor with stdout status lines until Ctrl+C.
async fn run_plain(config: MonitorConfig, on_reload: Option<String>) -> Result<()> {
    let cancel_token = CancellationToken::new();
    let mut monitor = ConnectionMonitor::new(
        config,
        WsTransport::new(),
        PlainHost::stdout(on_reload),
        cancel_token.clone(),
    );

    let monitor_handle = tokio::spawn(async move {
        monitor.run().await;
    });

    tokio::signal::ctrl_c().await?;
    info!("Interrupted, shutting down");
    cancel_token.cancel();
    let _ = tokio::time::timeout(Duration::from_millis(500), monitor_handle).await;

    Ok(())
}

/// Runs the monitor behind the TUI.
async fn run_tui(config: MonitorConfig, on_reload: Option<String>) -> Result<()> {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();
    let cancel_token = CancellationToken::new();

    let mut terminal = match setup_terminal() {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to initialize terminal");
            return Err(e.into());
        }
    };

    let mut app = App::new(config.endpoint.to_string());

    let mut monitor = ConnectionMonitor::new(
        config,
        WsTransport::new(),
        ChannelHost::new(event_tx.clone()),
        cancel_token.clone(),
    );
    let monitor_handle = tokio::spawn(async move {
        monitor.run().await;
    });

    let keyboard_handle = spawn_keyboard_task(event_tx, cancel_token.clone());

    let result = run_event_loop(
        &mut terminal,
        &mut app,
        &mut event_rx,
        on_reload.as_deref(),
        &cancel_token,
    )
    .await;

    cancel_token.cancel();

    let _ = tokio::time::timeout(Duration::from_millis(100), monitor_handle).await;
    let _ = tokio::time::timeout(Duration::from_millis(100), keyboard_handle).await;

    // Always restore the terminal, even on error
    if let Err(e) = cleanup_terminal(&mut terminal) {
        error!(error = %e, "Failed to cleanup terminal");
    }

    result
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.plain {
        init_plain_logging();
    } else {
        init_tui_logging();
    }

    let file_settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::load_default()?,
    };
    let settings = file_settings.merge(args.overrides());
    let config = settings.monitor_config()?;

    info!(
        endpoint = %config.endpoint,
        reconnect_delay_ms = u64::try_from(config.reconnect_delay.as_millis()).unwrap_or(u64::MAX),
        plain = args.plain,
        "lrm starting"
    );

    let result = if args.plain {
        run_plain(config, settings.on_reload).await
    } else {
        run_tui(config, settings.on_reload).await
    };

    info!("lrm stopped");
    result
}
