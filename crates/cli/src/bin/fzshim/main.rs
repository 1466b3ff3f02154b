//! JSON-lines host for the fzshim finder.
//!
//! Reads one `[name, args...]` event per stdin line and writes one JSON
//! notification per stdout line. Logs go to stderr.

mod app_dirs;
mod cli;
mod config;
mod host;
mod logging;

use std::io;

use anyhow::Result;
use cli::parse_cli;

fn main() -> Result<()> {
	let cli = parse_cli();
	let config = config::load(&cli)?;

	if cli.print_config {
		config.print_summary();
		return Ok(());
	}

	logging::init(&config.log_filter)?;
	tracing::debug!(settings = ?config.settings, "starting finder host");

	host::run(config.settings, io::stdin().lock(), io::stdout())
}
