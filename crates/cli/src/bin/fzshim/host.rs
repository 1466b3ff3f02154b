//! Stdio transport: JSON event arrays in, JSON notifications out.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use fzshim_core::{DisplaySink, Finder, Notification, Settings};
use serde_json::Value;

/// Writes each notification as one JSON object per line.
pub(crate) struct JsonLinesSink<W> {
	out: W,
}

impl<W: Write> JsonLinesSink<W> {
	pub(crate) fn new(out: W) -> Self {
		Self { out }
	}

	fn write(&mut self, notification: &Notification) -> std::io::Result<()> {
		serde_json::to_writer(&mut self.out, notification)?;
		self.out.write_all(b"\n")?;
		self.out.flush()
	}
}

impl<W: Write> DisplaySink for JsonLinesSink<W> {
	fn notify(&mut self, notification: Notification) {
		if let Err(err) = self.write(&notification) {
			tracing::warn!(%err, "failed to write notification");
		}
	}
}

/// Feed events from `input` to a finder until end of input.
pub(crate) fn run<R, W>(settings: Settings, input: R, output: W) -> Result<()>
where
	R: BufRead,
	W: Write + Send + 'static,
{
	let finder = Finder::spawn(JsonLinesSink::new(output), settings);

	for line in input.lines() {
		let line = line.context("failed to read event from input")?;
		let line = line.trim();
		if line.is_empty() {
			continue;
		}
		match serde_json::from_str::<Vec<Value>>(line) {
			Ok(args) => {
				if !finder.dispatch(&args) {
					tracing::debug!(line, "event dropped");
				}
			}
			Err(err) => tracing::warn!(%err, "skipping malformed event line"),
		}
	}

	finder.shutdown();
	Ok(())
}

#[cfg(test)]
mod tests {
	use std::io::{self, Cursor};
	use std::sync::{Arc, Mutex};

	use insta::assert_snapshot;

	use super::*;

	#[derive(Clone, Default)]
	struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

	impl SharedBuffer {
		fn lines(&self) -> Vec<String> {
			let bytes = self.0.lock().unwrap();
			String::from_utf8_lossy(&bytes)
				.lines()
				.map(str::to_owned)
				.collect()
		}
	}

	impl Write for SharedBuffer {
		fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
			self.0.lock().unwrap().extend_from_slice(buf);
			Ok(buf.len())
		}

		fn flush(&mut self) -> io::Result<()> {
			Ok(())
		}
	}

	fn drive(input: &str) -> Vec<String> {
		let output = SharedBuffer::default();
		run(Settings::default(), Cursor::new(input.to_owned()), output.clone()).unwrap();
		output.lines()
	}

	#[test]
	fn run_opens_the_finder() {
		let lines = drive("[\"run\", {\"source\": [\"a\", \"b\"]}]\n");
		assert_snapshot!(lines[..3].join("\n"), @r#"
		{"event":"show"}
		{"event":"pattern","text":""}
		{"event":"cursor","position":0}
		"#);
	}

	#[test]
	fn malformed_lines_are_skipped() {
		let lines = drive("not json\n\n[\"teleport\"]\n[\"run\", {\"source\": []}]\n[\"cancel\"]\n");
		assert_eq!(lines[0], r#"{"event":"show"}"#);
		assert_eq!(lines.last().map(String::as_str), Some(r#"{"event":"hide"}"#));
	}

	#[test]
	fn events_without_a_session_write_nothing() {
		assert!(drive("[\"char\", \"x\"]\n[\"down\"]\n").is_empty());
	}
}
