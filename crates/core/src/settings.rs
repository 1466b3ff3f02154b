use std::time::Duration;

use serde::Deserialize;

/// Tunables shared by every finder session.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
	/// Page capacity used when `run` does not carry a usable `max`.
	pub page_size: usize,
	/// Interval between partial result publications while a pass runs.
	pub throttle_ms: u64,
	/// Capacity of the bounded channel between a source and the filter pass.
	pub channel_capacity: usize,
	/// Program and leading arguments used to run command sources; the command
	/// string is appended as the final argument.
	pub shell: Vec<String>,
}

impl Settings {
	#[must_use]
	pub fn throttle(&self) -> Duration {
		Duration::from_millis(self.throttle_ms.max(1))
	}
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			page_size: 20,
			throttle_ms: 100,
			channel_capacity: 1_000,
			shell: vec!["sh".to_string(), "-c".to_string()],
		}
	}
}
