//! Sales AI Agent.
//!
//! A vim-style terminal interface that turns a topic into a sales pitch title
//! and a promotional email grounded in Wikipedia research.
//!
//! # Headless Mode
//!
//! Run with `--headless` for a line-oriented interface over stdin/stdout:
//!
//! ```bash
//! echo coffee | cargo run -p pitch -- --headless
//! ```

mod app;
mod events;
mod headless;
mod logging;
mod ui;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use pitch_core::{Config, Orchestrator};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};

use app::App;
use events::{handle_event, EventResult};
use headless::OutputFormat;
use ui::render::render;

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "pitch")]
#[command(about = "Sales AI Agent - sales pitch titles and emails grounded in Wikipedia")]
#[command(version)]
struct Args {
    /// Read topics from stdin and print results instead of starting the TUI
    #[arg(long)]
    headless: bool,

    /// Print one JSON object per submission (headless only)
    #[arg(long, requires = "headless")]
    json: bool,

    /// Env file to load instead of searching for `.env`
    #[arg(long, value_name = "PATH")]
    env_file: Option<PathBuf>,

    /// Write logs to this file (the TUI logs nowhere without it)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logging::init(args.log_file.as_deref(), args.verbose, args.headless)?;

    let config = Config::load(args.env_file.as_deref()).context("Failed to load configuration")?;
    let orchestrator =
        Orchestrator::from_config(&config).context("Failed to set up the pitch pipeline")?;
    info!(headless = args.headless, "Starting Sales AI Agent");

    if args.headless {
        let format = if args.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        };
        let stdin = io::stdin();
        return headless::run_headless(&orchestrator, stdin.lock(), stdout(), format)
            .await
            .context("Headless session failed");
    }

    let session = orchestrator.new_session()?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, App::new(orchestrator, session)).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        error!(error = %e, "TUI exited with an error");
    }
    result.context("Terminal error")
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
) -> io::Result<()> {
    let mut pending_topic: Option<String> = None;

    loop {
        terminal.draw(|f| render(f, &app))?;

        if let Some(topic) = pending_topic.take() {
            // Show the status before blocking on the pipeline
            app.start_processing(&topic);
            terminal.draw(|f| render(f, &app))?;

            app.process_submission(&topic).await;
            continue;
        }

        if event::poll(Duration::from_millis(100))? {
            let ev = event::read()?;
            match handle_event(&mut app, ev) {
                EventResult::Quit => return Ok(()),
                EventResult::Submit(topic) => pending_topic = Some(topic),
                EventResult::NeedsRedraw | EventResult::Continue => {}
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
