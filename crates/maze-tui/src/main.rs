mod app;
mod cli;
mod export;
mod render;
mod stats;
mod theme;

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use cli::{Args, Limits};
use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{self, Clear, ClearType},
};
use std::io::{self, Write};
use theme::Theme;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Logs go to stderr so they never land inside the drawing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let settings = args.into_settings(Limits::for_terminal(terminal::size().ok()));
    let app = App::new(settings, Theme::detect());

    let mut stdout = io::stdout();
    execute!(stdout, Hide, Clear(ClearType::All)).context("preparing terminal")?;

    let result = app.run(&mut stdout);

    // Restore terminal
    execute!(stdout, Show).context("restoring terminal")?;
    writeln!(stdout)?;

    result.map(|_| ())
}
