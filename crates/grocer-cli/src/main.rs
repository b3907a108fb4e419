//! `grocer`: track grocery purchases and review spending month by month.
//!
//! # Usage
//!
//! ```
//! grocer                                   # interactive terminal UI
//! grocer add --name Milk --price 3.50 --quantity 2 --store A
//! grocer report --month 3 --year 2024 --json
//! ```

mod app;
mod commands;
mod config;
mod ui;

use std::{
  fs::{self, OpenOptions},
  io,
  path::PathBuf,
  sync::Mutex,
  time::Duration,
};

use anyhow::{Context, Result};
use app::App;
use clap::{Parser, Subcommand};
use commands::{AddArgs, ReportArgs};
use config::{DEFAULT_CONFIG_PATH, Settings};
use crossterm::{
  event::{self, Event, KeyEventKind},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use grocer_core::{month::MonthSelection, store::ItemStore};
use grocer_store_sqlite::SqliteStore;
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "grocer", version, about = "Grocery purchase tracker")]
struct Cli {
  /// Path to a TOML config file.
  #[arg(short, long, value_name = "FILE", default_value = DEFAULT_CONFIG_PATH)]
  config: PathBuf,

  /// SQLite file holding the purchase list.
  #[arg(long, value_name = "FILE", env = "GROCER_STORE")]
  store: Option<PathBuf>,

  /// Carry the year over when stepping past December or before January.
  #[arg(long)]
  rollover: bool,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Record a purchase dated now.
  Add(AddArgs),
  /// Print one month's listing and totals.
  Report(ReportArgs),
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();

  let mut settings = Settings::load(&cli.config)?;
  if let Some(store) = &cli.store {
    settings.store_path = config::expand_tilde(store);
  }
  if cli.rollover {
    settings.month_rollover = true;
  }

  init_tracing(&settings, cli.command.is_none())?;

  if let Some(parent) = settings.store_path.parent()
    && !parent.as_os_str().is_empty()
  {
    fs::create_dir_all(parent)
      .with_context(|| format!("creating data directory {}", parent.display()))?;
  }
  let backend = SqliteStore::open(&settings.store_path)
    .await
    .with_context(|| format!("opening store {}", settings.store_path.display()))?;
  let mut items = ItemStore::open(backend)
    .await
    .context("loading groceries")?;

  match cli.command {
    Some(Command::Add(args)) => commands::add(&mut items, &args).await,
    Some(Command::Report(args)) => commands::report(&items, &args),
    None => {
      let app = App::new(items, MonthSelection::current(), settings.navigation());
      run_tui(app).await
    }
  }
}

/// Subcommands log to stderr. The TUI owns the terminal, so it only logs
/// when a log file is configured.
fn init_tracing(settings: &Settings, interactive: bool) -> Result<()> {
  let filter = || {
    EnvFilter::builder()
      .with_default_directive(LevelFilter::INFO.into())
      .from_env_lossy()
  };

  match (&settings.log_file, interactive) {
    (Some(path), _) => {
      let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;
      tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    }
    (None, false) => {
      tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_writer(io::stderr)
        .init();
    }
    (None, true) => {}
  }
  Ok(())
}

// ─── Terminal UI ──────────────────────────────────────────────────────────────

async fn run_tui(mut app: App<SqliteStore>) -> Result<()> {
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  let run_result = run_event_loop(&mut terminal, &mut app).await;

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App<SqliteStore>,
) -> Result<()> {
  loop {
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(Event::Key(key)) = maybe_event
      && key.kind == KeyEventKind::Press
      && !app.handle_key(key).await
    {
      break;
    }
  }

  Ok(())
}
