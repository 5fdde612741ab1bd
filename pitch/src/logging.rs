//! Tracing subscriber setup.
//!
//! `RUST_LOG` wins when set. Otherwise the level is `info`, or `debug` with
//! `--verbose`. The TUI owns the terminal, so it only logs when given a file.

use anyhow::Context;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub fn init(log_file: Option<&Path>, verbose: bool, headless: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        None if headless => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
        None => {}
    }

    Ok(())
}

fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "warn,pitch=debug,pitch_core=debug,claude=debug"
    } else {
        "warn,pitch=info,pitch_core=info,claude=info"
    }
}
