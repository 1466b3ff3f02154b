use anyhow::{Context, Result, anyhow};
use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber. `RUST_LOG` wins over the configured filter.
pub(crate) fn init(filter: &str) -> Result<()> {
	let filter = match EnvFilter::try_from_default_env() {
		Ok(filter) => filter,
		Err(_) => EnvFilter::try_new(filter)
			.with_context(|| format!("invalid log filter {filter:?}"))?,
	};

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(false)
		.try_init()
		.map_err(|err| anyhow!("failed to install logger: {err}"))
}
