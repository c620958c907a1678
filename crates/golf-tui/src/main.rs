//! `norskgolf`: terminal client for the golf course tracker.
//!
//! # Usage
//!
//! ```
//! norskgolf --url http://localhost:8080
//! norskgolf --config ~/.config/norskgolf.toml --log-file /tmp/norskgolf.log
//! ```
//!
//! Settings are read from the config file, then `NORSKGOLF_*` environment
//! variables (nested keys use `__`, e.g. `NORSKGOLF_SERVER__LOGIN_MODE=form`),
//! then command-line flags.

mod app;
mod ui;
mod views;

#[cfg(test)]
mod tests;

use std::{fs::File, io, path::PathBuf, sync::Mutex, time::Duration};

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use crossterm::{
  event::{self, Event},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use golf_client::{ApiClient, ClientConfig, LoginMode};
use golf_core::api::GolfApi;
use ratatui::{Terminal, backend::CrosstermBackend};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "norskgolf", version, about = "Terminal client for the golf course tracker")]
struct Args {
  /// Path to a TOML config file. Missing is fine.
  #[arg(short, long, value_name = "FILE", default_value = "norskgolf.toml")]
  config: PathBuf,

  /// Origin of the golf server (default: http://localhost:8080).
  #[arg(long, env = "NORSKGOLF_URL")]
  url: Option<String>,

  /// Write logs to this file. Logging is off without it.
  #[arg(long, value_name = "FILE", env = "NORSKGOLF_LOG_FILE")]
  log_file: Option<PathBuf>,

  /// Log in through the form endpoint instead of the JSON API.
  #[arg(long)]
  form_login: bool,
}

// ─── Config file ──────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Settings {
  server:   ClientConfig,
  log_file: Option<PathBuf>,
}

fn load_settings(args: &Args) -> Result<Settings> {
  let mut settings: Settings = config::Config::builder()
    .add_source(config::File::from(args.config.clone()).required(false))
    .add_source(
      config::Environment::with_prefix("NORSKGOLF")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true),
    )
    .build()
    .context("failed to read config")?
    .try_deserialize()
    .context("failed to deserialise settings")?;

  // CLI flags override config file and environment.
  if let Some(url) = &args.url {
    settings.server.base_url = url.clone();
  }
  if args.form_login {
    settings.server.login_mode = LoginMode::Form;
  }
  if args.log_file.is_some() {
    settings.log_file = args.log_file.clone();
  }
  Ok(settings)
}

/// The terminal belongs to the UI, so logs only go to a file.
fn init_tracing(path: Option<&PathBuf>) -> Result<()> {
  let Some(path) = path else {
    return Ok(());
  };
  let file = File::options()
    .create(true)
    .append(true)
    .open(path)
    .with_context(|| format!("opening log file {}", path.display()))?;
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_ansi(false)
    .with_writer(Mutex::new(file))
    .init();
  Ok(())
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();
  let settings = load_settings(&args)?;
  init_tracing(settings.log_file.as_ref())?;

  tracing::info!(server = %settings.server.base_url, "starting");
  let client = ApiClient::new(settings.server).context("building HTTP client")?;
  let mut app = App::new(client);
  app.start();

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  // Run the event loop; restore terminal even on error.
  let run_result = run_event_loop(&mut terminal, &mut app);

  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

// ─── Event loop ───────────────────────────────────────────────────────────────

fn run_event_loop<A: GolfApi + 'static>(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App<A>,
) -> Result<()> {
  loop {
    app.drain();
    app.tick();
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Poll for an event, letting spawned requests progress on other workers.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(Event::Key(key)) = maybe_event {
      if !app.handle_key(key) {
        break;
      }
    }
  }

  Ok(())
}
