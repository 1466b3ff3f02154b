//! Layered configuration: default file, `--config` files, environment
//! variables such as `FZSHIM_ENGINE__PAGE_SIZE`, then command-line flags.

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, ensure};
use config::{Config, Environment, File, FileFormat, FileSourceFile};
use fzshim_core::Settings;
use serde::Deserialize;

use crate::app_dirs;
use crate::cli::{CliArgs, shell_words};

const DEFAULT_LOG_FILTER: &str = "warn";
const ENV_PREFIX: &str = "fzshim";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
	engine: EngineSection,
	logging: LoggingSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct EngineSection {
	page_size: Option<usize>,
	throttle_ms: Option<u64>,
	channel_capacity: Option<usize>,
	shell: Option<ShellSetting>,
}

/// A shell as a word list or as one whitespace-separated string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ShellSetting {
	Words(Vec<String>),
	Line(String),
}

impl ShellSetting {
	fn into_words(self) -> Vec<String> {
		match self {
			Self::Words(words) => words,
			Self::Line(line) => shell_words(&line),
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct LoggingSection {
	filter: Option<String>,
}

/// Effective settings after every layer has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResolvedConfig {
	pub(crate) settings: Settings,
	pub(crate) log_filter: String,
}

impl ResolvedConfig {
	pub(crate) fn print_summary(&self) {
		println!("Effective configuration:");
		println!("  Page size: {}", self.settings.page_size);
		println!("  Throttle: {} ms", self.settings.throttle_ms);
		println!("  Channel capacity: {}", self.settings.channel_capacity);
		println!("  Shell: {}", self.settings.shell.join(" "));
		println!("  Log filter: {}", self.log_filter);
	}
}

pub(crate) fn load(cli: &CliArgs) -> Result<ResolvedConfig> {
	load_with_env(cli, environment())
}

fn load_with_env(cli: &CliArgs, env: Environment) -> Result<ResolvedConfig> {
	let mut raw: RawConfig = build_config(cli, env)?
		.try_deserialize()
		.map_err(|err| anyhow!("failed to deserialize configuration: {err}"))?;
	raw.apply_cli_overrides(cli);
	raw.resolve()
}

/// `FZSHIM_<SECTION>__<KEY>`, e.g. `FZSHIM_ENGINE__THROTTLE_MS=50`.
fn environment() -> Environment {
	Environment::with_prefix(ENV_PREFIX)
		.prefix_separator("_")
		.separator("__")
		.try_parsing(true)
}

/// Files in merge order: the optional per-user file, then every `--config`.
fn config_files(cli: &CliArgs) -> impl Iterator<Item = File<FileSourceFile, FileFormat>> + '_ {
	let user = if cli.no_config {
		None
	} else {
		user_config_file()
	};
	user.map(|path| File::from(path).required(false))
		.into_iter()
		.chain(cli.config.iter().map(|path| File::from(path.clone()).required(true)))
}

fn build_config(cli: &CliArgs, env: Environment) -> Result<Config> {
	config_files(cli)
		.fold(Config::builder(), |builder, file| builder.add_source(file))
		.add_source(env)
		.build()
		.context("failed to load configuration")
}

fn user_config_file() -> Option<PathBuf> {
	match app_dirs::get_config_dir() {
		Ok(dir) => Some(dir.join("config.toml")),
		Err(err) => {
			tracing::debug!(%err, "no default configuration directory");
			None
		}
	}
}

impl RawConfig {
	fn apply_cli_overrides(&mut self, cli: &CliArgs) {
		if let Some(max) = cli.max {
			self.engine.page_size = Some(max);
		}
		if let Some(throttle_ms) = cli.throttle_ms {
			self.engine.throttle_ms = Some(throttle_ms);
		}
		if let Some(shell) = &cli.shell {
			self.engine.shell = Some(ShellSetting::Line(shell.clone()));
		}
		if let Some(filter) = &cli.log_filter {
			self.logging.filter = Some(filter.clone());
		}
	}

	fn resolve(self) -> Result<ResolvedConfig> {
		let defaults = Settings::default();
		let settings = Settings {
			page_size: self.engine.page_size.unwrap_or(defaults.page_size),
			throttle_ms: self.engine.throttle_ms.unwrap_or(defaults.throttle_ms),
			channel_capacity: self
				.engine
				.channel_capacity
				.unwrap_or(defaults.channel_capacity),
			shell: self
				.engine
				.shell
				.map(ShellSetting::into_words)
				.unwrap_or(defaults.shell),
		};

		ensure!(settings.page_size > 0, "page_size must be at least 1");
		ensure!(settings.throttle_ms > 0, "throttle_ms must be greater than zero");
		ensure!(
			settings.channel_capacity > 0,
			"channel_capacity must be greater than zero"
		);
		ensure!(!settings.shell.is_empty(), "shell must name a program");

		let log_filter = self
			.logging
			.filter
			.map(|filter| filter.trim().to_string())
			.filter(|filter| !filter.is_empty())
			.unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

		Ok(ResolvedConfig {
			settings,
			log_filter,
		})
	}
}

#[cfg(test)]
mod tests {
	use std::fs;

	use clap::Parser;
	use tempfile::TempDir;

	use super::*;

	fn args(extra: &[&str]) -> CliArgs {
		let mut argv = vec!["fzshim", "--no-config"];
		argv.extend_from_slice(extra);
		CliArgs::parse_from(argv)
	}

	fn write_config(dir: &TempDir, contents: &str) -> String {
		let path = dir.path().join("fzshim.toml");
		fs::write(&path, contents).unwrap();
		path.to_string_lossy().into_owned()
	}

	#[test]
	fn defaults_match_the_engine() {
		let resolved = RawConfig::default().resolve().unwrap();
		assert_eq!(resolved.settings, Settings::default());
		assert_eq!(resolved.log_filter, "warn");
	}

	#[test]
	fn file_values_are_loaded() {
		let dir = TempDir::new().unwrap();
		let path = write_config(
			&dir,
			r#"
[engine]
page_size = 12
throttle_ms = 40
shell = ["bash", "-c"]

[logging]
filter = "fzshim_core=debug"
"#,
		);

		let resolved = load(&args(&["--config", &path])).unwrap();
		assert_eq!(resolved.settings.page_size, 12);
		assert_eq!(resolved.settings.throttle_ms, 40);
		assert_eq!(resolved.settings.channel_capacity, 1_000);
		assert_eq!(resolved.settings.shell, vec!["bash", "-c"]);
		assert_eq!(resolved.log_filter, "fzshim_core=debug");
	}

	#[test]
	fn flags_override_the_file() {
		let dir = TempDir::new().unwrap();
		let path = write_config(&dir, "[engine]\npage_size = 12\nshell = \"zsh -c\"\n");

		let resolved = load(&args(&[
			"--config",
			&path,
			"--max",
			"5",
			"--shell",
			"dash -c",
		]))
		.unwrap();
		assert_eq!(resolved.settings.page_size, 5);
		assert_eq!(resolved.settings.shell, vec!["dash", "-c"]);
	}

	#[test]
	fn a_shell_string_is_split_into_words() {
		let dir = TempDir::new().unwrap();
		let path = write_config(&dir, "[engine]\nshell = \"zsh -c\"\n");
		let resolved = load(&args(&["--config", &path])).unwrap();
		assert_eq!(resolved.settings.shell, vec!["zsh", "-c"]);
	}

	#[test]
	fn environment_sits_between_files_and_flags() {
		let dir = TempDir::new().unwrap();
		let path = write_config(&dir, "[engine]\npage_size = 12\nthrottle_ms = 40\n");
		let vars = [
			("FZSHIM_ENGINE__PAGE_SIZE", "9"),
			("FZSHIM_ENGINE__THROTTLE_MS", "25"),
			("FZSHIM_ENGINE__SHELL", "bash -c"),
			("FZSHIM_LOGGING__FILTER", "debug"),
		];
		let env = environment().source(Some(
			vars.iter()
				.map(|(key, value)| ((*key).to_string(), (*value).to_string()))
				.collect(),
		));

		let resolved = load_with_env(&args(&["--config", &path, "--max", "3"]), env).unwrap();
		assert_eq!(resolved.settings.page_size, 3);
		assert_eq!(resolved.settings.throttle_ms, 25);
		assert_eq!(resolved.settings.shell, vec!["bash", "-c"]);
		assert_eq!(resolved.log_filter, "debug");
	}

	#[test]
	fn zero_throttle_is_rejected() {
		let err = load(&args(&["--throttle-ms", "0"])).unwrap_err();
		assert!(err.to_string().contains("throttle_ms"));
	}

	#[test]
	fn blank_shell_is_rejected() {
		let err = load(&args(&["--shell", "  "])).unwrap_err();
		assert!(err.to_string().contains("shell"));
	}

	#[test]
	fn a_missing_explicit_file_is_an_error() {
		let dir = TempDir::new().unwrap();
		let missing = dir.path().join("absent.toml");
		assert!(load(&args(&["--config", &missing.to_string_lossy()])).is_err());
	}
}
