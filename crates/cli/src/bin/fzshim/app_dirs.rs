//! Resolve the configuration directory for `fzshim`.

use std::env;
use std::path::PathBuf;

use anyhow::{Result, anyhow};

const APPLICATION: &str = "fzshim";
const CONFIG_DIR_ENV: &str = "FZSHIM_CONFIG_DIR";

/// Resolve an override directory from an environment variable.
///
/// An empty value counts as unset.
fn dir_from_env(name: &str) -> Option<PathBuf> {
	let value = env::var_os(name)?;
	if value.is_empty() {
		None
	} else {
		Some(PathBuf::from(value))
	}
}

/// Return the directory holding `config.toml`.
pub(crate) fn get_config_dir() -> Result<PathBuf> {
	if let Some(dir) = dir_from_env(CONFIG_DIR_ENV) {
		return Ok(dir);
	}

	dirs::config_dir()
		.map(|dir| dir.join(APPLICATION))
		.ok_or_else(|| anyhow!("unable to determine the configuration directory for fzshim"))
}
