//! userdir-manager binary entry point.
//!
//! Parses the command line, initializes the terminal in raw mode, runs the
//! TUI event loop, and restores the terminal state on exit.
//!
use anyhow::{Context as _, Result};
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use userdir_manager::api::DirectoryClient;
use userdir_manager::app::keymap::Keymap;
use userdir_manager::app::{self, AppState, Theme};

#[derive(Parser, Debug)]
#[command(name = "userdir-manager", version, about)]
struct Cli {
    /// Base URL of the user directory collection endpoint.
    #[arg(
        long,
        env = "USERDIR_API_URL",
        default_value = "http://localhost:3000/api/users"
    )]
    api_url: String,

    /// Path to the theme configuration file.
    #[arg(long, default_value = "theme.conf")]
    theme_file: String,

    /// Path to the keybindings configuration file.
    #[arg(long, default_value = "keybinds.conf")]
    keybinds_file: String,
}

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Program entry point: run the TUI and report any top-level error to stderr.
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = DirectoryClient::new(&cli.api_url)?;
    let app = AppState::new(
        Theme::load_or_init(&cli.theme_file),
        Keymap::load_or_init(&cli.keybinds_file),
    );

    let mut terminal = init_terminal().context("init terminal")?;

    let res = app::run(&mut terminal, app, client).await;

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    if let Err(err) = res {
        eprintln!("application error: {err}");
    }
    Ok(())
}
