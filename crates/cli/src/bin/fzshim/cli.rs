use std::path::PathBuf;

use clap::{ArgAction, Parser};

/// Command-line arguments accepted by the `fzshim` binary.
#[derive(Parser, Debug)]
#[command(
	name = "fzshim",
	version,
	about = "Incremental fuzzy finder speaking JSON lines over stdio"
)]
pub(crate) struct CliArgs {
	#[arg(
		short,
		long = "config",
		value_name = "FILE",
		env = "FZSHIM_CONFIG",
		action = ArgAction::Append,
		help = "Additional configuration file to merge"
	)]
	pub(crate) config: Vec<PathBuf>,
	#[arg(
		short = 'n',
		long = "no-config",
		help = "Skip loading the default configuration file"
	)]
	pub(crate) no_config: bool,
	#[arg(
		short = 'm',
		long,
		value_name = "ROWS",
		help = "Page size used when a run does not set one"
	)]
	pub(crate) max: Option<usize>,
	#[arg(
		long = "throttle-ms",
		value_name = "MILLIS",
		help = "Interval between partial result updates"
	)]
	pub(crate) throttle_ms: Option<u64>,
	#[arg(
		long,
		value_name = "COMMAND",
		help = "Shell used to run command sources, e.g. \"bash -c\""
	)]
	pub(crate) shell: Option<String>,
	#[arg(
		long = "log-filter",
		value_name = "FILTER",
		help = "Log filter directives when RUST_LOG is unset"
	)]
	pub(crate) log_filter: Option<String>,
	#[arg(long = "print-config", help = "Print the effective configuration and exit")]
	pub(crate) print_config: bool,
}

pub(crate) fn parse_cli() -> CliArgs {
	CliArgs::parse()
}

/// Split a shell invocation such as `bash -c` into its words.
pub(crate) fn shell_words(shell: &str) -> Vec<String> {
	shell.split_whitespace().map(str::to_owned).collect()
}
